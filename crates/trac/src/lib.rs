//! Ticket lookup against per-project Trac instances.
//!
//! [`TicketService`] is the seam callers depend on. [`TracClient`] speaks
//! JSON-RPC to a live tracker; [`InMemoryTicketService`] serves canned
//! tickets for offline runs and tests.

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod record;
pub mod service;

pub use client::TracClient;
pub use config::TracConfig;
pub use error::TicketServiceError;
pub use memory::InMemoryTicketService;
pub use record::TicketRecord;
pub use service::TicketService;
