//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! any `PgExecutor` as the first argument: `&PgPool` for standalone calls,
//! `&mut *tx` inside a transaction.

pub mod contract_repo;
pub mod customer_request_repo;
pub mod project_repo;
pub mod ticket_mirror_repo;
pub mod time_entry_repo;

pub use contract_repo::ContractRepo;
pub use customer_request_repo::CustomerRequestRepo;
pub use project_repo::ProjectRepo;
pub use ticket_mirror_repo::TicketMirrorRepo;
pub use time_entry_repo::TimeEntryRepo;
