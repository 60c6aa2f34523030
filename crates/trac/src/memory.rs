//! A ticket service backed by a map, for offline runs and tests.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use timebook_core::types::TicketNumber;

use crate::error::TicketServiceError;
use crate::record::TicketRecord;
use crate::service::TicketService;

/// Serves tickets registered with [`InMemoryTicketService::insert`].
///
/// Namespaces marked unavailable fail every lookup with a transient error,
/// which lets callers exercise their degraded paths.
#[derive(Default)]
pub struct InMemoryTicketService {
    tickets: RwLock<HashMap<(String, TicketNumber), TicketRecord>>,
    unavailable: RwLock<HashSet<String>>,
}

impl InMemoryTicketService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ticket under `namespace`.
    pub fn insert(&self, namespace: &str, record: TicketRecord) {
        if let Ok(mut tickets) = self.tickets.write() {
            tickets.insert((namespace.to_string(), record.id), record);
        }
    }

    /// Make every lookup in `namespace` fail as if the tracker were down.
    pub fn set_unavailable(&self, namespace: &str, unavailable: bool) {
        if let Ok(mut set) = self.unavailable.write() {
            if unavailable {
                set.insert(namespace.to_string());
            } else {
                set.remove(namespace);
            }
        }
    }

    fn is_unavailable(&self, namespace: &str) -> bool {
        self.unavailable
            .read()
            .map(|set| set.contains(namespace))
            .unwrap_or(true)
    }
}

#[async_trait]
impl TicketService for InMemoryTicketService {
    async fn fetch(
        &self,
        namespace: &str,
        ticket: TicketNumber,
    ) -> Result<TicketRecord, TicketServiceError> {
        if self.is_unavailable(namespace) {
            return Err(TicketServiceError::Http {
                status: 503,
                body: format!("{namespace} is unavailable"),
            });
        }

        let tickets = self
            .tickets
            .read()
            .map_err(|_| TicketServiceError::Malformed("ticket store poisoned".into()))?;
        tickets
            .get(&(namespace.to_string(), ticket))
            .cloned()
            .ok_or_else(|| TicketServiceError::NotFound {
                namespace: namespace.to_string(),
                ticket,
            })
    }
}
