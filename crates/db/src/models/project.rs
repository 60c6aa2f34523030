//! Project entity model, tracker namespaces and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timebook_core::types::Timestamp;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub id: String,
    pub name: String,
}

/// A ticket-tracker namespace row from the `tracs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trac {
    pub trac_name: String,
    pub project_id: String,
    pub created_at: Timestamp,
}

/// DTO for attaching a namespace to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrac {
    pub trac_name: String,
}
