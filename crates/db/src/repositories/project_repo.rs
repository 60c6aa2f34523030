//! Repository for the `projects` and `tracs` tables.

use sqlx::PgExecutor;

use crate::models::project::{CreateProject, Project, Trac};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

const TRAC_COLUMNS: &str = "trac_name, project_id, created_at";

/// Provides CRUD operations for projects and their tracker namespaces.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .fetch_one(executor)
            .await
    }

    /// Find a project by its id.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all projects ordered by name.
    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY name, id");
        sqlx::query_as::<_, Project>(&query).fetch_all(executor).await
    }

    /// Attach a tracker namespace to a project.
    ///
    /// The caller validates `trac_name`; the table enforces the same pattern.
    pub async fn add_trac(
        executor: impl PgExecutor<'_>,
        project_id: &str,
        trac_name: &str,
    ) -> Result<Trac, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracs (trac_name, project_id) VALUES ($1, $2) RETURNING {TRAC_COLUMNS}"
        );
        sqlx::query_as::<_, Trac>(&query)
            .bind(trac_name)
            .bind(project_id)
            .fetch_one(executor)
            .await
    }

    /// Namespaces of one project, sorted by name.
    pub async fn list_tracs(
        executor: impl PgExecutor<'_>,
        project_id: &str,
    ) -> Result<Vec<Trac>, sqlx::Error> {
        let query = format!(
            "SELECT {TRAC_COLUMNS} FROM tracs WHERE project_id = $1 ORDER BY trac_name"
        );
        sqlx::query_as::<_, Trac>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Every namespace of every project, sorted by project then name.
    pub async fn list_all_tracs(executor: impl PgExecutor<'_>) -> Result<Vec<Trac>, sqlx::Error> {
        let query = format!("SELECT {TRAC_COLUMNS} FROM tracs ORDER BY project_id, trac_name");
        sqlx::query_as::<_, Trac>(&query).fetch_all(executor).await
    }
}
