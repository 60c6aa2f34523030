//! Reconciliation of a single time entry at creation time.
//!
//! Creating an entry is an explicit two-step call: derive `tickettype` and
//! `contract_id` from the tracker, then insert, inside one transaction. The
//! tracker is best-effort: if it is slow, down, or does not know the ticket,
//! the entry is still created and the batch pass fills the contract in later.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use timebook_core::error::CoreError;
use timebook_core::namespace::NamespaceChoice;
use timebook_core::types::TicketNumber;
use timebook_db::models::time_entry::{
    CreateTimeEntry, DerivedFields, TimeEntry, TICKETTYPE_MAX_CHARS,
};
use timebook_db::repositories::{CustomerRequestRepo, ProjectRepo, TimeEntryRepo};
use timebook_trac::{TicketRecord, TicketService, TicketServiceError};

use crate::config::ReconcileConfig;
use crate::error::ReconcileError;
use crate::namespaces::NamespaceIndex;

/// What happened while reconciling one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// The entry carries no ticket.
    NoTicket,
    /// The entry's project has no usable tracker namespace.
    NoNamespace,
    /// The tracker failed or timed out; nothing was derived.
    TrackerUnavailable { reason: String },
    /// The tracker does not know the ticket.
    TicketNotFound,
    /// The ticket has no customer request, or names one that does not exist.
    /// The ticket type was still recorded.
    NoCustomerRequest { customer_request_id: Option<String> },
    /// The ticket's customer request was found. `contract_id` is `None` while
    /// the request awaits a contract.
    Linked {
        customer_request_id: String,
        contract_id: Option<String>,
    },
}

/// Derived fields together with the outcome that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub derived: DerivedFields,
    pub outcome: EntryOutcome,
}

impl Reconciliation {
    fn untouched(outcome: EntryOutcome) -> Self {
        Self {
            derived: DerivedFields::default(),
            outcome,
        }
    }
}

/// Derives contract attribution for new entries from the ticket tracker.
#[derive(Clone)]
pub struct EntryReconciler {
    tickets: Arc<dyn TicketService>,
    config: ReconcileConfig,
}

impl EntryReconciler {
    pub fn new(tickets: Arc<dyn TicketService>, config: ReconcileConfig) -> Self {
        Self { tickets, config }
    }

    /// Validate, reconcile and insert a new time entry.
    ///
    /// Tracker problems never fail this call; only validation and database
    /// errors do.
    pub async fn create(
        &self,
        pool: &PgPool,
        input: &CreateTimeEntry,
    ) -> Result<(TimeEntry, EntryOutcome), ReconcileError> {
        if input.duration_secs < 0 {
            return Err(CoreError::Validation("duration_secs must not be negative".into()).into());
        }

        let mut tx = pool.begin().await?;

        ProjectRepo::find_by_id(&mut *tx, &input.project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", &input.project_id))?;

        let reconciliation = self
            .reconcile(&mut *tx, &input.project_id, input.ticket)
            .await?;
        let entry = TimeEntryRepo::create(&mut *tx, input, &reconciliation.derived).await?;

        tx.commit().await?;

        tracing::info!(
            time_entry_id = entry.id,
            project_id = %entry.project_id,
            ticket = ?entry.ticket,
            contract_id = ?entry.contract_id,
            outcome = ?reconciliation.outcome,
            "Time entry created"
        );
        Ok((entry, reconciliation.outcome))
    }

    /// Derive `tickettype` and `contract_id` for an entry of `project_id`
    /// referencing `ticket`. Performs at most one tracker call.
    pub async fn reconcile(
        &self,
        conn: &mut PgConnection,
        project_id: &str,
        ticket: Option<TicketNumber>,
    ) -> Result<Reconciliation, sqlx::Error> {
        let Some(ticket) = ticket else {
            return Ok(Reconciliation::untouched(EntryOutcome::NoTicket));
        };

        let tracs = ProjectRepo::list_tracs(&mut *conn, project_id).await?;
        let index = NamespaceIndex::from_tracs(tracs);
        let namespace = match index.resolve(project_id, self.config.namespace_policy) {
            NamespaceChoice::Resolved(ns) => ns.to_string(),
            NamespaceChoice::Missing | NamespaceChoice::Ambiguous(_) => {
                tracing::warn!(project_id, ticket, "No usable tracker namespace for project");
                return Ok(Reconciliation::untouched(EntryOutcome::NoNamespace));
            }
        };

        let record = match self.lookup(&namespace, ticket).await {
            Ok(record) => record,
            Err(TicketServiceError::NotFound { .. }) => {
                tracing::info!(namespace = %namespace, ticket, "Ticket not found, contract left unset");
                return Ok(Reconciliation::untouched(EntryOutcome::TicketNotFound));
            }
            Err(err) => {
                tracing::warn!(namespace = %namespace, ticket, error = %err, "Ticket lookup failed, contract left unset");
                return Ok(Reconciliation::untouched(EntryOutcome::TrackerUnavailable {
                    reason: err.to_string(),
                }));
            }
        };

        tracing::debug!(
            namespace = %namespace,
            ticket,
            summary = record.summary().unwrap_or_default(),
            "Fetched ticket"
        );

        let mut derived = DerivedFields {
            tickettype: record.ticket_type().map(|t| fit_ticket_type(&namespace, ticket, t)),
            contract_id: None,
        };

        let Some(cr_id) = record.customer_request_id() else {
            return Ok(Reconciliation {
                derived,
                outcome: EntryOutcome::NoCustomerRequest {
                    customer_request_id: None,
                },
            });
        };

        match CustomerRequestRepo::find_by_id(&mut *conn, &cr_id).await? {
            Some(cr) => {
                derived.contract_id = cr.contract_id.clone();
                Ok(Reconciliation {
                    derived,
                    outcome: EntryOutcome::Linked {
                        customer_request_id: cr.id,
                        contract_id: cr.contract_id,
                    },
                })
            }
            None => {
                tracing::warn!(
                    namespace = %namespace,
                    ticket,
                    customer_request_id = %cr_id,
                    "Ticket references unknown customer request"
                );
                Ok(Reconciliation {
                    derived,
                    outcome: EntryOutcome::NoCustomerRequest {
                        customer_request_id: Some(cr_id),
                    },
                })
            }
        }
    }

    /// One tracker call bounded by the configured deadline. Never retried.
    async fn lookup(
        &self,
        namespace: &str,
        ticket: TicketNumber,
    ) -> Result<TicketRecord, TicketServiceError> {
        let started = Instant::now();
        match tokio::time::timeout(self.config.lookup_timeout, self.tickets.fetch(namespace, ticket))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TicketServiceError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
        }
    }
}

/// Clip a tracker-supplied ticket type to the column width, on a char
/// boundary.
fn fit_ticket_type(namespace: &str, ticket: TicketNumber, ticket_type: &str) -> String {
    match ticket_type.char_indices().nth(TICKETTYPE_MAX_CHARS) {
        Some((cut, _)) => {
            tracing::warn!(
                namespace,
                ticket,
                ticket_type,
                max_chars = TICKETTYPE_MAX_CHARS,
                "Ticket type too long, truncated"
            );
            ticket_type[..cut].to_string()
        }
        None => ticket_type.to_string(),
    }
}
