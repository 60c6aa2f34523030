use axum::routing::post;
use axum::Router;

use crate::handlers::reconciliation;
use crate::state::AppState;

/// Routes mounted at `/reconciliation`.
///
/// ```text
/// POST   /    -> run (?shards=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(reconciliation::run))
}
