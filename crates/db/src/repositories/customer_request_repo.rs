//! Repository for the `customer_requests` table.

use sqlx::PgExecutor;

use crate::models::customer_request::{CreateCustomerRequest, CustomerRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, project_id, contract_id, created_at, updated_at";

/// Provides CRUD operations for customer requests.
pub struct CustomerRequestRepo;

impl CustomerRequestRepo {
    /// Insert a new customer request, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateCustomerRequest,
    ) -> Result<CustomerRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO customer_requests (id, name, project_id, contract_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRequest>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.project_id)
            .bind(&input.contract_id)
            .fetch_one(executor)
            .await
    }

    /// Find a customer request by its id.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: &str,
    ) -> Result<Option<CustomerRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customer_requests WHERE id = $1");
        sqlx::query_as::<_, CustomerRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List customer requests, optionally restricted to one project.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        project_id: Option<&str>,
    ) -> Result<Vec<CustomerRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_requests \
             WHERE ($1::TEXT IS NULL OR project_id = $1) \
             ORDER BY id"
        );
        sqlx::query_as::<_, CustomerRequest>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// List the customer requests linked to a contract.
    pub async fn list_by_contract(
        executor: impl PgExecutor<'_>,
        contract_id: &str,
    ) -> Result<Vec<CustomerRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_requests WHERE contract_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, CustomerRequest>(&query)
            .bind(contract_id)
            .fetch_all(executor)
            .await
    }

    /// Link a customer request to a contract.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_contract(
        executor: impl PgExecutor<'_>,
        id: &str,
        contract_id: &str,
    ) -> Result<Option<CustomerRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE customer_requests SET contract_id = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRequest>(&query)
            .bind(id)
            .bind(contract_id)
            .fetch_optional(executor)
            .await
    }
}
