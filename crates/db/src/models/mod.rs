pub mod contract;
pub mod customer_request;
pub mod project;
pub mod ticket_mirror;
pub mod time_entry;
