//! Repository for the `time_entries` table.

use sqlx::PgExecutor;
use timebook_core::types::DbId;

use crate::models::time_entry::{
    CreateTimeEntry, DerivedFields, TicketedEntry, TimeEntry, UpdateTimeEntry,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, date, start_at, end_at, duration_secs, description, \
    location, ticket, tickettype, invoice_number, contract_id, workflow_state, \
    created_at, updated_at";

/// Provides CRUD operations for time entries.
pub struct TimeEntryRepo;

impl TimeEntryRepo {
    /// Insert a new time entry together with its reconciled fields.
    ///
    /// If `location` is `None` in the input, defaults to `RedTurtle`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateTimeEntry,
        derived: &DerivedFields,
    ) -> Result<TimeEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_entries \
                (project_id, date, start_at, end_at, duration_secs, description, location, \
                 ticket, tickettype, invoice_number, contract_id) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'RedTurtle'), $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(&input.project_id)
            .bind(input.date)
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(input.duration_secs)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.ticket)
            .bind(&derived.tickettype)
            .bind(&input.invoice_number)
            .bind(&derived.contract_id)
            .fetch_one(executor)
            .await
    }

    /// Find a time entry by its id.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_entries WHERE id = $1");
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List entries of one project, most recent work first.
    pub async fn list_by_project(
        executor: impl PgExecutor<'_>,
        project_id: &str,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries WHERE project_id = $1 ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// List entries attributed to a contract.
    pub async fn list_by_contract(
        executor: impl PgExecutor<'_>,
        contract_id: &str,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries WHERE contract_id = $1 ORDER BY date, id"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(contract_id)
            .fetch_all(executor)
            .await
    }

    /// Every entry's id, project and ticket, ordered by id.
    pub async fn list_ticket_refs(
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<TicketedEntry>, sqlx::Error> {
        sqlx::query_as::<_, TicketedEntry>(
            "SELECT id, project_id, ticket FROM time_entries ORDER BY id",
        )
        .fetch_all(executor)
        .await
    }

    /// Update the user-editable fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateTimeEntry,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE time_entries SET \
                date = COALESCE($2, date), \
                duration_secs = COALESCE($3, duration_secs), \
                description = COALESCE($4, description), \
                location = COALESCE($5, location), \
                invoice_number = COALESCE($6, invoice_number), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.duration_secs)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.invoice_number)
            .fetch_optional(executor)
            .await
    }

    /// Attribute an entry to a contract.
    ///
    /// Writes only when the stored value differs, so repeated reconciliation
    /// passes report zero changes. Returns `true` if a row was updated.
    pub async fn set_contract(
        executor: impl PgExecutor<'_>,
        id: DbId,
        contract_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE time_entries SET contract_id = $2, updated_at = NOW() \
             WHERE id = $1 AND contract_id IS DISTINCT FROM $2",
        )
        .bind(id)
        .bind(contract_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a new workflow state.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_workflow_state(
        executor: impl PgExecutor<'_>,
        id: DbId,
        state: &str,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE time_entries SET workflow_state = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(id)
            .bind(state)
            .fetch_optional(executor)
            .await
    }
}
