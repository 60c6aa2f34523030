//! Customer request entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timebook_core::types::Timestamp;

/// A customer request row from the `customer_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomerRequest {
    pub id: String,
    pub name: String,
    pub project_id: String,
    /// `None` while the request is not attached to any contract.
    pub contract_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a customer request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub contract_id: Option<String>,
}
