use std::sync::Arc;

use timebook_reconcile::{BatchReconciler, EntryReconciler};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and reconcilers are reference-counted inside.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: timebook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Creation-time reconciliation against the ticket tracker.
    pub entries: EntryReconciler,
    /// Batch reconciliation against the ticket mirror.
    pub batch: BatchReconciler,
}
