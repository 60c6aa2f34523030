//! Route definitions for the `/contracts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /          -> list (?project_id=)
/// POST   /          -> create
/// POST   /import    -> import (?shards=)
/// GET    /{id}      -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contract::list).post(contract::create))
        .route("/import", post(contract::import))
        .route("/{id}", get(contract::get_by_id))
}
