use timebook_core::types::TicketNumber;

/// Errors from a ticket lookup.
///
/// [`TicketServiceError::NotFound`] is the only variant meaning "the tracker
/// answered and the ticket does not exist"; every other variant is a
/// transient service failure.
#[derive(Debug, thiserror::Error)]
pub enum TicketServiceError {
    /// The tracker has no such ticket.
    #[error("Ticket #{ticket} not found in {namespace}")]
    NotFound {
        namespace: String,
        ticket: TicketNumber,
    },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Ticket service request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The tracker returned a non-2xx status code.
    #[error("Ticket service HTTP error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The tracker answered with a JSON-RPC error other than "not found".
    #[error("Ticket service RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response could not be interpreted as a ticket.
    #[error("Malformed ticket response: {0}")]
    Malformed(String),

    /// The lookup did not complete within the caller's deadline.
    #[error("Ticket lookup timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl TicketServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
