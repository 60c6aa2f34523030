//! Handlers for the `/projects` resource and its tracker namespaces.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timebook_core::error::CoreError;
use timebook_core::namespace::validate_namespace;
use timebook_db::models::project::{CreateProject, CreateTrac, Project, Trac};
use timebook_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.id.trim().is_empty() {
        return Err(CoreError::Validation("Project id must not be empty".into()).into());
    }
    let project = ProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", &id))?;
    Ok(Json(project))
}

/// GET /api/v1/projects/{id}/tracs
pub async fn list_tracs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Trac>>>> {
    ensure_project(&state, &id).await?;
    let tracs = ProjectRepo::list_tracs(&state.pool, &id).await?;
    Ok(Json(DataResponse { data: tracs }))
}

/// POST /api/v1/projects/{id}/tracs
///
/// Namespace keys become schema names, so they are validated here before
/// the table's own check constraint sees them.
pub async fn add_trac(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateTrac>,
) -> AppResult<(StatusCode, Json<Trac>)> {
    validate_namespace(&input.trac_name).map_err(CoreError::Validation)?;
    ensure_project(&state, &id).await?;
    let trac = ProjectRepo::add_trac(&state.pool, &id, &input.trac_name).await?;
    Ok((StatusCode::CREATED, Json(trac)))
}

async fn ensure_project(state: &AppState, id: &str) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", id))?;
    Ok(())
}
