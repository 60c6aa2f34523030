//! Handlers for the `/time-entries` resource.
//!
//! Creation goes through the entry reconciler, which fills in `tickettype`
//! and `contract_id` from the ticket tracker before the insert. Those fields
//! are never accepted from the client.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use timebook_core::acl::{time_entry_permissions, Permissions};
use timebook_core::error::CoreError;
use timebook_core::types::DbId;
use timebook_core::workflow::validate_state_name;
use timebook_db::models::time_entry::{CreateTimeEntry, TimeEntry, UpdateTimeEntry};
use timebook_db::repositories::TimeEntryRepo;
use timebook_reconcile::EntryOutcome;

use crate::error::{AppError, AppResult};
use crate::query::TimeEntryFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// A time entry with its duration in display units.
#[derive(Debug, Serialize)]
pub struct TimeEntryView {
    #[serde(flatten)]
    pub entry: TimeEntry,
    /// Duration as `H:MM`.
    pub hours_str: String,
    /// Duration in 8-hour work days.
    pub work_days: f64,
}

impl From<TimeEntry> for TimeEntryView {
    fn from(entry: TimeEntry) -> Self {
        Self {
            hours_str: entry.hours_str(),
            work_days: entry.hours_as_work_days(),
            entry,
        }
    }
}

/// Response to a create: the stored entry and how its contract was derived.
#[derive(Debug, Serialize)]
pub struct CreatedTimeEntry {
    #[serde(flatten)]
    pub view: TimeEntryView,
    pub reconciliation: EntryOutcome,
}

#[derive(Debug, Serialize)]
pub struct PermissionsView {
    pub time_entry_id: DbId,
    pub workflow_state: String,
    pub grants: Permissions,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub state: String,
}

/// POST /api/v1/time-entries
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTimeEntry>,
) -> AppResult<(StatusCode, Json<CreatedTimeEntry>)> {
    let (entry, outcome) = state.entries.create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedTimeEntry {
            view: entry.into(),
            reconciliation: outcome,
        }),
    ))
}

/// GET /api/v1/time-entries?project_id= | ?contract_id=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TimeEntryFilter>,
) -> AppResult<Json<DataResponse<Vec<TimeEntryView>>>> {
    let entries = match (filter.project_id.as_deref(), filter.contract_id.as_deref()) {
        (Some(project_id), None) => TimeEntryRepo::list_by_project(&state.pool, project_id).await?,
        (None, Some(contract_id)) => {
            TimeEntryRepo::list_by_contract(&state.pool, contract_id).await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "Specify exactly one of project_id or contract_id".into(),
            ))
        }
    };
    Ok(Json(DataResponse {
        data: entries.into_iter().map(TimeEntryView::from).collect(),
    }))
}

/// GET /api/v1/time-entries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TimeEntryView>> {
    let entry = find(&state, id).await?;
    Ok(Json(entry.into()))
}

/// PUT /api/v1/time-entries/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTimeEntry>,
) -> AppResult<Json<TimeEntryView>> {
    if input.duration_secs.is_some_and(|secs| secs < 0) {
        return Err(CoreError::Validation("duration_secs must not be negative".into()).into());
    }
    let entry = TimeEntryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("TimeEntry", id))?;
    Ok(Json(entry.into()))
}

/// GET /api/v1/time-entries/{id}/permissions
///
/// Grants are recomputed from the entry's current workflow state on every
/// call.
pub async fn permissions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PermissionsView>> {
    let entry = find(&state, id).await?;
    Ok(Json(PermissionsView {
        time_entry_id: entry.id,
        grants: time_entry_permissions(&entry.workflow_state),
        workflow_state: entry.workflow_state,
    }))
}

/// POST /api/v1/time-entries/{id}/transition
///
/// Stores the new workflow state. Transition rules belong to the workflow
/// engine; only the state name is validated here.
pub async fn transition(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<Json<TimeEntryView>> {
    validate_state_name(&input.state).map_err(CoreError::Validation)?;
    let entry = TimeEntryRepo::set_workflow_state(&state.pool, id, &input.state)
        .await?
        .ok_or_else(|| CoreError::not_found("TimeEntry", id))?;
    tracing::info!(time_entry_id = id, state = %entry.workflow_state, "Workflow state changed");
    Ok(Json(entry.into()))
}

async fn find(state: &AppState, id: DbId) -> AppResult<TimeEntry> {
    let entry = TimeEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("TimeEntry", id))?;
    Ok(entry)
}
