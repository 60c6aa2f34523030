//! Handlers for the `/contracts` resource, including spreadsheet import.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use timebook_core::contract_rows::ContractRow;
use timebook_core::error::CoreError;
use timebook_db::models::contract::{Contract, CreateContract};
use timebook_db::models::customer_request::CustomerRequest;
use timebook_db::repositories::{ContractRepo, CustomerRequestRepo};
use timebook_reconcile::{BatchReconciler, ContractImporter, ImportReport};

use crate::error::AppResult;
use crate::query::{ProjectFilter, ShardParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// A contract with the customer requests linked to it.
#[derive(Debug, Serialize)]
pub struct ContractDetail {
    #[serde(flatten)]
    pub contract: Contract,
    pub customer_requests: Vec<CustomerRequest>,
}

/// POST /api/v1/contracts
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<Contract>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Contract name must not be empty".into()).into());
    }
    let contract = ContractRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// GET /api/v1/contracts
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<Contract>>>> {
    let contracts = ContractRepo::list(&state.pool, filter.project_id.as_deref()).await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContractDetail>> {
    let contract = ContractRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Contract", &id))?;
    let customer_requests = CustomerRequestRepo::list_by_contract(&state.pool, &id).await?;
    Ok(Json(ContractDetail {
        contract,
        customer_requests,
    }))
}

/// POST /api/v1/contracts/import
///
/// Body: the JSON array a spreadsheet export produces. Runs the import and
/// the follow-up batch pass in one transaction.
pub async fn import(
    State(state): State<AppState>,
    Query(params): Query<ShardParams>,
    Json(rows): Json<Vec<ContractRow>>,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let batch = match params.shard_count()? {
        Some(shards) => BatchReconciler::new(state.batch.config().clone().with_shard_count(shards)),
        None => state.batch.clone(),
    };
    let report = ContractImporter::new(batch).import(&state.pool, &rows).await?;
    Ok(Json(DataResponse { data: report }))
}
