//! Rows read from the per-namespace ticket custom-field mirror.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timebook_core::types::{DbId, TicketNumber};

/// A time entry that references a ticket, as fed into a mirror query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketRef {
    pub time_entry_id: DbId,
    pub ticket: TicketNumber,
}

/// One match from a mirror query: the `customerrequest` custom field of the
/// ticket referenced by time entry `tp_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow, Serialize)]
pub struct MirrorRow {
    pub cr_id: String,
    pub tp_id: DbId,
}
