//! Handlers for the `/customer-requests` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use timebook_core::error::CoreError;
use timebook_db::models::customer_request::{CreateCustomerRequest, CustomerRequest};
use timebook_db::repositories::CustomerRequestRepo;

use crate::error::AppResult;
use crate::query::ProjectFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/customer-requests
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<CustomerRequest>)> {
    if input.id.trim().is_empty() {
        return Err(CoreError::Validation("Customer request id must not be empty".into()).into());
    }
    let cr = CustomerRequestRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(cr)))
}

/// GET /api/v1/customer-requests
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<CustomerRequest>>>> {
    let requests = CustomerRequestRepo::list(&state.pool, filter.project_id.as_deref()).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/customer-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CustomerRequest>> {
    let cr = CustomerRequestRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("CustomerRequest", &id))?;
    Ok(Json(cr))
}
