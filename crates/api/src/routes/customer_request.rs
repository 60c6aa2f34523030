use axum::routing::get;
use axum::Router;

use crate::handlers::customer_request;
use crate::state::AppState;

/// Routes mounted at `/customer-requests`.
///
/// ```text
/// GET    /        -> list (?project_id=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customer_request::list).post(customer_request::create),
        )
        .route("/{id}", get(customer_request::get_by_id))
}
