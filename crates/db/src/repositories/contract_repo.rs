//! Repository for the `contracts` table.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::contract::{Contract, ContractMetadata, CreateContract};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, days, amount, contract_number, workflow_state, \
    project_id, created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract with a generated id, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts \
                (id, name, days, amount, contract_number, workflow_state, project_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(Uuid::now_v7().to_string())
            .bind(&input.name)
            .bind(input.metadata.days)
            .bind(input.metadata.amount)
            .bind(&input.metadata.contract_number)
            .bind(input.metadata.workflow_state.as_str())
            .bind(&input.project_id)
            .fetch_one(executor)
            .await
    }

    /// Find a contract by its id.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: &str,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List contracts, optionally restricted to one project, ordered by name.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        project_id: Option<&str>,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts \
             WHERE ($1::TEXT IS NULL OR project_id = $1) \
             ORDER BY name, created_at"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Overwrite the commercial fields of a contract.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_metadata(
        executor: impl PgExecutor<'_>,
        id: &str,
        metadata: &ContractMetadata,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET \
                days = $2, \
                amount = $3, \
                contract_number = $4, \
                workflow_state = $5, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(metadata.days)
            .bind(metadata.amount)
            .bind(&metadata.contract_number)
            .bind(metadata.workflow_state.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Point a contract at a project. Returns `true` if a row was updated.
    pub async fn set_project(
        executor: impl PgExecutor<'_>,
        id: &str,
        project_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contracts SET project_id = $2, updated_at = NOW() \
             WHERE id = $1 AND project_id IS DISTINCT FROM $2",
        )
        .bind(id)
        .bind(project_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count contracts carrying `name`. Used to surface duplicates created by
    /// relationship-based matching.
    pub async fn count_by_name(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contracts WHERE name = $1")
            .bind(name)
            .fetch_one(executor)
            .await
    }
}
