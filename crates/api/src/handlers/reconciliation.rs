use axum::extract::{Query, State};
use axum::Json;
use timebook_reconcile::{BatchReconciler, ReconcileReport};

use crate::error::AppResult;
use crate::query::ShardParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/reconciliation
///
/// Runs one batch pass synchronously. Passes take no locks, so callers must
/// not start a second one while another is running.
pub async fn run(
    State(state): State<AppState>,
    Query(params): Query<ShardParams>,
) -> AppResult<Json<DataResponse<ReconcileReport>>> {
    let report = match params.shard_count()? {
        Some(shards) => {
            BatchReconciler::new(state.batch.config().clone().with_shard_count(shards))
                .run(&state.pool)
                .await?
        }
        None => state.batch.run(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: report }))
}
