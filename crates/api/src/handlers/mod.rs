pub mod contract;
pub mod customer_request;
pub mod project;
pub mod reconciliation;
pub mod time_entry;
