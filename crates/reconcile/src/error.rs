use timebook_core::error::CoreError;

/// Errors that abort a reconciliation or import.
///
/// Missing tickets, customer requests and time entries are not errors: they
/// are counted in the run's report and skipped.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// A domain-level error from `timebook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx. The surrounding transaction is rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
