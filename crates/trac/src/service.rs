use async_trait::async_trait;
use timebook_core::types::TicketNumber;

use crate::error::TicketServiceError;
use crate::record::TicketRecord;

/// Fetches single tickets from the tracker instance behind a namespace.
///
/// Implementations have no side effects and do not cache. Callers bound the
/// call with their own deadline and never retry inline.
#[async_trait]
pub trait TicketService: Send + Sync {
    async fn fetch(
        &self,
        namespace: &str,
        ticket: TicketNumber,
    ) -> Result<TicketRecord, TicketServiceError>;
}
