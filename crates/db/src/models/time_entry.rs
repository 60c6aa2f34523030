//! Time entry entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timebook_core::durations;
use timebook_core::types::{DbId, TicketNumber, Timestamp};

/// A time entry row from the `time_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntry {
    pub id: DbId,
    pub project_id: String,
    pub date: NaiveDate,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    /// Logged duration in whole seconds.
    pub duration_secs: i64,
    pub description: Option<String>,
    pub location: String,
    pub ticket: Option<TicketNumber>,
    /// Ticket type cached from the tracker.
    pub tickettype: Option<String>,
    pub invoice_number: Option<String>,
    /// Derived from ticket -> customer request -> contract.
    pub contract_id: Option<String>,
    pub workflow_state: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimeEntry {
    /// Logged duration as `H:MM`.
    pub fn hours_str(&self) -> String {
        durations::as_human_str(self.duration_secs, false)
    }

    /// Logged duration in billable work days.
    pub fn hours_as_work_days(&self) -> f64 {
        durations::as_work_days(self.duration_secs)
    }
}

/// DTO for logging time. Derived fields are not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimeEntry {
    pub project_id: String,
    pub date: NaiveDate,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub duration_secs: i64,
    pub description: Option<String>,
    /// Defaults to `RedTurtle` if omitted.
    pub location: Option<String>,
    pub ticket: Option<TicketNumber>,
    pub invoice_number: Option<String>,
}

/// Width of the `time_entries.tickettype` column, in characters.
pub const TICKETTYPE_MAX_CHARS: usize = 25;

/// Fields filled in by reconciliation before the entry is inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub tickettype: Option<String>,
    pub contract_id: Option<String>,
}

/// DTO for updating a time entry. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTimeEntry {
    pub date: Option<NaiveDate>,
    pub duration_secs: Option<i64>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub invoice_number: Option<String>,
}

/// Minimal projection read by batch reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TicketedEntry {
    pub id: DbId,
    pub project_id: String,
    pub ticket: Option<TicketNumber>,
}
