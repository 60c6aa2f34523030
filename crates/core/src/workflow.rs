//! Workflow state values for contracts and time entries.
//!
//! The workflow engine itself lives outside this system; these are the
//! values it stores and the mapping used when contracts are imported.

use serde::{Deserialize, Serialize};

/// Initial workflow state of every time entry. Owners may edit and delete
/// their entries only while this is the current state.
pub const TIME_ENTRY_STATE_NEW: &str = "new";

/// Maximum length of a workflow state name.
pub const MAX_STATE_LENGTH: usize = 32;

/// Lifecycle of a commercial contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    Active,
    #[default]
    Draft,
    Done,
}

impl ContractState {
    /// Return the state name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Done => "done",
        }
    }

    /// Parse a stored state name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "draft" => Some(Self::Draft),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Map a spreadsheet status code (`stato` column).
    ///
    /// `A` is active, `B` draft, `D` done. Any other code, including an empty
    /// cell, falls back to draft.
    pub fn from_status_code(code: &str) -> Self {
        match code.trim() {
            "A" => Self::Active,
            "B" => Self::Draft,
            "D" => Self::Done,
            _ => Self::Draft,
        }
    }

    /// All valid state values.
    pub const ALL: &'static [&'static str] = &["active", "draft", "done"];
}

impl std::fmt::Display for ContractState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a workflow state name written through the transition primitive.
pub fn validate_state_name(state: &str) -> Result<(), String> {
    if state.trim().is_empty() {
        return Err("Workflow state must not be empty".to_string());
    }
    if state.len() > MAX_STATE_LENGTH {
        return Err(format!(
            "Workflow state exceeds maximum length of {MAX_STATE_LENGTH} characters"
        ));
    }
    if !state
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!(
            "Invalid workflow state '{state}'. Use lowercase letters, digits and underscores"
        ));
    }
    Ok(())
}
