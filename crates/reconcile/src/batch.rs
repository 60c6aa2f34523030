//! Batch repair of time-entry contract attribution.
//!
//! Every ticketed entry is grouped under its project's tracker namespace,
//! namespaces are dealt round-robin into shards, and each shard is resolved
//! with a single UNIONed query against the mirrored `ticket_custom` tables.
//! Matches are applied fill-forward: `contract_id` is written only when the
//! ticket's customer request has a contract, and is never cleared.
//!
//! A pass recomputes everything from scratch, so re-running after a failure
//! needs no resume state, and a second pass over unchanged data writes
//! nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use timebook_core::namespace::NamespaceChoice;
use timebook_core::sharding::split_round_robin;
use timebook_db::models::ticket_mirror::{MirrorRow, TicketRef};
use timebook_db::repositories::{
    CustomerRequestRepo, ProjectRepo, TicketMirrorRepo, TimeEntryRepo,
};

use crate::config::ReconcileConfig;
use crate::error::ReconcileError;
use crate::namespaces::NamespaceIndex;

/// Counters describing one batch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Time entries read.
    pub entries_scanned: usize,
    /// Entries without a ticket; invisible to reconciliation.
    pub missing_ticket: usize,
    /// Ticketed entries whose project has no namespace.
    pub missing_namespace: usize,
    /// Ticketed entries whose project has several namespaces under the
    /// `reject_ambiguous` policy.
    pub ambiguous_namespace: usize,
    /// Ticketed entries whose namespace has no mirror table.
    pub unmirrored_namespace: usize,
    /// Distinct namespaces queried.
    pub namespaces: usize,
    /// Shard statements executed (empty shards are not executed).
    pub shards_executed: usize,
    /// Rows returned by all shard statements.
    pub rows_matched: usize,
    /// Rows naming a customer request that does not exist.
    pub unknown_customer_request: usize,
    /// Rows whose customer request has no contract yet.
    pub unlinked_customer_request: usize,
    /// Rows naming a time entry that no longer exists.
    pub missing_time_entry: usize,
    /// Entries whose `contract_id` was written.
    pub entries_updated: usize,
    /// Entries already attributed to the right contract.
    pub entries_unchanged: usize,
}

impl ReconcileReport {
    /// Entries or rows that need operator attention.
    pub fn integrity_warnings(&self) -> usize {
        self.missing_namespace
            + self.ambiguous_namespace
            + self.unmirrored_namespace
            + self.unknown_customer_request
    }
}

/// Offline, single-pass contract reconciliation.
#[derive(Debug, Clone, Default)]
pub struct BatchReconciler {
    config: ReconcileConfig,
}

impl BatchReconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run one pass in its own transaction.
    pub async fn run(&self, pool: &PgPool) -> Result<ReconcileReport, ReconcileError> {
        let mut tx = pool.begin().await?;
        let report = self.run_in(&mut *tx).await?;
        tx.commit().await?;
        Ok(report)
    }

    /// Run one pass on `conn`, typically inside a caller's transaction.
    pub async fn run_in(&self, conn: &mut PgConnection) -> Result<ReconcileReport, ReconcileError> {
        let mut report = ReconcileReport::default();

        let by_namespace = self.collect_ticket_refs(conn, &mut report).await?;
        report.namespaces = by_namespace.len();

        let shards = split_round_robin(by_namespace, self.config.shard_count);
        let mut contracts = ContractCache::default();

        for (idx, shard) in shards.iter().enumerate() {
            let Some(sql) = TicketMirrorRepo::build_shard_query(&self.config.schema_prefix, shard)
            else {
                continue;
            };

            let rows = TicketMirrorRepo::fetch_shard(&mut *conn, &sql).await?;
            report.shards_executed += 1;
            report.rows_matched += rows.len();
            tracing::debug!(
                shard = idx,
                namespaces = shard.len(),
                rows = rows.len(),
                "Executed mirror query"
            );

            for row in &rows {
                self.apply_row(conn, row, &mut contracts, &mut report).await?;
            }
        }

        tracing::info!(
            entries_scanned = report.entries_scanned,
            namespaces = report.namespaces,
            shards_executed = report.shards_executed,
            entries_updated = report.entries_updated,
            entries_unchanged = report.entries_unchanged,
            missing_ticket = report.missing_ticket,
            integrity_warnings = report.integrity_warnings(),
            "Batch reconciliation finished"
        );
        Ok(report)
    }

    /// Group every ticketed entry under its resolved namespace.
    async fn collect_ticket_refs(
        &self,
        conn: &mut PgConnection,
        report: &mut ReconcileReport,
    ) -> Result<BTreeMap<String, Vec<TicketRef>>, sqlx::Error> {
        let index = NamespaceIndex::from_tracs(ProjectRepo::list_all_tracs(&mut *conn).await?);
        let mirrored: BTreeSet<String> =
            TicketMirrorRepo::list_mirrored_namespaces(&mut *conn, &self.config.schema_prefix)
                .await?;
        let entries = TimeEntryRepo::list_ticket_refs(&mut *conn).await?;

        let mut by_namespace: BTreeMap<String, Vec<TicketRef>> = BTreeMap::new();
        for entry in entries {
            report.entries_scanned += 1;

            let Some(ticket) = entry.ticket else {
                tracing::warn!(time_entry_id = entry.id, "TimeEntry has no ticket");
                report.missing_ticket += 1;
                continue;
            };

            let namespace = match index.resolve(&entry.project_id, self.config.namespace_policy) {
                NamespaceChoice::Resolved(ns) => ns,
                NamespaceChoice::Missing => {
                    tracing::warn!(
                        time_entry_id = entry.id,
                        project_id = %entry.project_id,
                        "Project has no tracker namespace"
                    );
                    report.missing_namespace += 1;
                    continue;
                }
                NamespaceChoice::Ambiguous(count) => {
                    tracing::warn!(
                        time_entry_id = entry.id,
                        project_id = %entry.project_id,
                        count,
                        "Project has several tracker namespaces"
                    );
                    report.ambiguous_namespace += 1;
                    continue;
                }
            };

            if !mirrored.contains(namespace) {
                tracing::warn!(
                    time_entry_id = entry.id,
                    namespace,
                    "Namespace has no ticket mirror"
                );
                report.unmirrored_namespace += 1;
                continue;
            }

            by_namespace
                .entry(namespace.to_string())
                .or_default()
                .push(TicketRef {
                    time_entry_id: entry.id,
                    ticket,
                });
        }

        Ok(by_namespace)
    }

    /// Apply one mirror match. Missing rows anywhere in the chain are skips.
    async fn apply_row(
        &self,
        conn: &mut PgConnection,
        row: &MirrorRow,
        contracts: &mut ContractCache,
        report: &mut ReconcileReport,
    ) -> Result<(), sqlx::Error> {
        let contract_id = match contracts.lookup(conn, &row.cr_id).await? {
            CustomerRequestLink::Unknown => {
                tracing::warn!(
                    time_entry_id = row.tp_id,
                    customer_request_id = %row.cr_id,
                    "Ticket references unknown customer request"
                );
                report.unknown_customer_request += 1;
                return Ok(());
            }
            CustomerRequestLink::Unlinked => {
                report.unlinked_customer_request += 1;
                return Ok(());
            }
            CustomerRequestLink::Contract(id) => id,
        };

        let Some(entry) = TimeEntryRepo::find_by_id(&mut *conn, row.tp_id).await? else {
            report.missing_time_entry += 1;
            return Ok(());
        };

        if entry.contract_id.as_deref() == Some(contract_id.as_str()) {
            report.entries_unchanged += 1;
            return Ok(());
        }

        if TimeEntryRepo::set_contract(&mut *conn, entry.id, &contract_id).await? {
            tracing::debug!(
                time_entry_id = entry.id,
                previous = ?entry.contract_id,
                contract_id = %contract_id,
                "Time entry attributed to contract"
            );
            report.entries_updated += 1;
        } else {
            report.entries_unchanged += 1;
        }
        Ok(())
    }
}

/// Contract link of a customer request, as seen by one pass.
#[derive(Debug, Clone)]
enum CustomerRequestLink {
    Unknown,
    Unlinked,
    Contract(String),
}

/// Memoizes customer request lookups for the duration of one pass. All
/// shards read the same snapshot of request-to-contract links.
#[derive(Debug, Default)]
struct ContractCache {
    links: HashMap<String, CustomerRequestLink>,
}

impl ContractCache {
    async fn lookup(
        &mut self,
        conn: &mut PgConnection,
        cr_id: &str,
    ) -> Result<CustomerRequestLink, sqlx::Error> {
        if let Some(link) = self.links.get(cr_id) {
            return Ok(link.clone());
        }
        let link = match CustomerRequestRepo::find_by_id(&mut *conn, cr_id).await? {
            None => CustomerRequestLink::Unknown,
            Some(cr) => match cr.contract_id {
                None => CustomerRequestLink::Unlinked,
                Some(id) => CustomerRequestLink::Contract(id),
            },
        };
        self.links.insert(cr_id.to_string(), link.clone());
        Ok(link)
    }
}
