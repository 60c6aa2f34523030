/// Primary keys of locally generated rows (time entries) are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// External ticket numbers as stored by the tracker.
pub type TicketNumber = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
