//! Contract reconciliation for time entries.
//!
//! - [`entry::EntryReconciler`] derives ticket type and contract for a new
//!   entry from a live ticket lookup, then persists it.
//! - [`batch::BatchReconciler`] repairs `contract_id` for every ticketed
//!   entry from the relational ticket mirror, shard by shard.
//! - [`import::ContractImporter`] merges spreadsheet rows into contracts and
//!   finishes with a batch pass inside the same transaction.
//!
//! The batch pass takes no locks. Running two passes (or an import and a
//! pass) against the same database at once can interleave writes to the same
//! rows; schedule them so they never overlap.

pub mod batch;
pub mod config;
pub mod entry;
pub mod error;
pub mod import;
pub mod namespaces;

pub use batch::{BatchReconciler, ReconcileReport};
pub use config::ReconcileConfig;
pub use entry::{EntryOutcome, EntryReconciler};
pub use error::ReconcileError;
pub use import::{ContractImporter, ImportReport};
