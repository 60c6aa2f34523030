//! Pure domain logic for timebook: identifiers, error taxonomy, workflow
//! states, access-control derivation, shard partitioning, spreadsheet row
//! merging and duration formatting.
//!
//! Nothing in this crate touches the network or the database; the only
//! environment access is the `config` helpers used at startup.

pub mod acl;
pub mod config;
pub mod contract_rows;
pub mod durations;
pub mod error;
pub mod namespace;
pub mod roles;
pub mod sharding;
pub mod types;
pub mod workflow;
