//! Route definitions for the `/time-entries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::time_entry;
use crate::state::AppState;

/// Routes mounted at `/time-entries`.
///
/// ```text
/// GET    /                    -> list (?project_id= | ?contract_id=)
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// GET    /{id}/permissions    -> permissions
/// POST   /{id}/transition     -> transition
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(time_entry::list).post(time_entry::create))
        .route("/{id}", get(time_entry::get_by_id).put(time_entry::update))
        .route("/{id}/permissions", get(time_entry::permissions))
        .route("/{id}/transition", post(time_entry::transition))
}
