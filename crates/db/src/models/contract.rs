//! Contract entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timebook_core::contract_rows::ContractGroup;
use timebook_core::types::Timestamp;
use timebook_core::workflow::ContractState;

/// A contract row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: String,
    pub name: String,
    pub days: f64,
    pub amount: f64,
    pub contract_number: Option<String>,
    /// One of `active`, `draft`, `done`.
    pub workflow_state: String,
    pub project_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Commercial fields overwritten on every import.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContractMetadata {
    pub days: f64,
    pub amount: f64,
    pub contract_number: Option<String>,
    pub workflow_state: ContractState,
}

impl From<&ContractGroup> for ContractMetadata {
    fn from(group: &ContractGroup) -> Self {
        Self {
            days: group.days,
            amount: group.amount,
            contract_number: group.contract_number.clone(),
            workflow_state: group.state,
        }
    }
}

/// DTO for creating a contract. The id is generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub name: String,
    #[serde(flatten)]
    pub metadata: ContractMetadata,
    pub project_id: Option<String>,
}
