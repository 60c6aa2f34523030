//! A ticket as returned by the tracker.

use serde::Serialize;
use serde_json::{Map, Value};
use timebook_core::types::TicketNumber;

use crate::error::TicketServiceError;

/// Attribute holding the ticket type.
pub const FIELD_TYPE: &str = "type";

/// Attribute holding the one-line summary.
pub const FIELD_SUMMARY: &str = "summary";

/// Custom field linking the ticket to a customer request.
pub const FIELD_CUSTOMER_REQUEST: &str = "customerrequest";

/// A ticket's id and attribute map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRecord {
    pub id: TicketNumber,
    pub attributes: Map<String, Value>,
}

impl TicketRecord {
    pub fn new(id: TicketNumber, attributes: Map<String, Value>) -> Self {
        Self { id, attributes }
    }

    /// Parse the `ticket.get` result: `[id, time_created, time_changed, attributes]`.
    pub fn from_rpc_result(result: &Value) -> Result<Self, TicketServiceError> {
        let parts = result
            .as_array()
            .ok_or_else(|| TicketServiceError::Malformed("result is not an array".into()))?;

        let id = parts
            .first()
            .and_then(Value::as_i64)
            .and_then(|id| TicketNumber::try_from(id).ok())
            .ok_or_else(|| TicketServiceError::Malformed("missing ticket id".into()))?;

        let attributes = parts
            .get(3)
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| TicketServiceError::Malformed("missing ticket attributes".into()))?;

        Ok(Self { id, attributes })
    }

    pub fn ticket_type(&self) -> Option<&str> {
        self.text(FIELD_TYPE)
    }

    pub fn summary(&self) -> Option<&str> {
        self.text(FIELD_SUMMARY)
    }

    /// The linked customer request id, if the field is set.
    ///
    /// Numeric values are accepted and rendered as text.
    pub fn customer_request_id(&self) -> Option<String> {
        match self.attributes.get(FIELD_CUSTOMER_REQUEST)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.attributes
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}
