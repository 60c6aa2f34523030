//! Contract import from spreadsheet rows.
//!
//! Rows are merged per contract name, then each group is matched to an
//! existing contract through its customer requests, never by name: the
//! contract already linked to the group's first resolvable request is
//! updated, otherwise a new one is created. A contract whose name exists but
//! which is linked to none of the group's requests is therefore not found,
//! and a second contract with the same name is created.
//!
//! All contract writes, request links and the closing batch pass share one
//! transaction.

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use timebook_core::contract_rows::{merge_rows, ContractGroup, ContractRow};
use timebook_db::models::contract::{Contract, ContractMetadata, CreateContract};
use timebook_db::models::customer_request::CustomerRequest;
use timebook_db::repositories::{ContractRepo, CustomerRequestRepo};

use crate::batch::{BatchReconciler, ReconcileReport};
use crate::error::ReconcileError;

/// Counters describing one import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Distinct contract names in the sheet.
    pub groups: usize,
    pub contracts_created: usize,
    pub contracts_updated: usize,
    /// Groups with no resolvable customer request.
    pub groups_skipped: usize,
    /// Groups whose rows carried differing metadata (last row applied).
    pub divergent_groups: usize,
    /// Created contracts whose name was already in use.
    pub duplicate_names: usize,
    pub requests_linked: usize,
    /// Customer request ids in the sheet that do not exist.
    pub unknown_customer_requests: Vec<String>,
    /// Rows without a contract name.
    pub unnamed_rows: usize,
    /// Named rows without a customer request id.
    pub rows_without_request: usize,
    /// The batch pass run after the import.
    pub reconciliation: ReconcileReport,
}

/// Merges contract rows into the database and re-attributes time entries.
#[derive(Debug, Clone, Default)]
pub struct ContractImporter {
    batch: BatchReconciler,
}

impl ContractImporter {
    pub fn new(batch: BatchReconciler) -> Self {
        Self { batch }
    }

    /// Import `rows` in one transaction.
    ///
    /// Unknown customer requests and groups with nothing to link are
    /// reported, not fatal. Any database error rolls back every change,
    /// including the batch pass.
    pub async fn import(
        &self,
        pool: &PgPool,
        rows: &[ContractRow],
    ) -> Result<ImportReport, ReconcileError> {
        let merged = merge_rows(rows);
        let mut report = ImportReport {
            groups: merged.groups.len(),
            unnamed_rows: merged.unnamed_rows,
            rows_without_request: merged.rows_without_request,
            ..Default::default()
        };

        let mut tx = pool.begin().await?;

        for group in &merged.groups {
            self.apply_group(&mut tx, group, &mut report).await?;
        }
        report.reconciliation = self.batch.run_in(&mut tx).await?;

        tx.commit().await?;

        tracing::info!(
            groups = report.groups,
            contracts_created = report.contracts_created,
            contracts_updated = report.contracts_updated,
            groups_skipped = report.groups_skipped,
            unknown_customer_requests = report.unknown_customer_requests.len(),
            entries_updated = report.reconciliation.entries_updated,
            "Contract import committed"
        );
        Ok(report)
    }

    async fn apply_group(
        &self,
        conn: &mut PgConnection,
        group: &ContractGroup,
        report: &mut ImportReport,
    ) -> Result<(), ReconcileError> {
        if group.divergent {
            tracing::warn!(
                contract = %group.name,
                "Rows for this contract disagree on metadata, last row applied"
            );
            report.divergent_groups += 1;
        }

        let requests = Self::resolve_requests(conn, group, report).await?;
        let Some(first) = requests.first() else {
            tracing::warn!(
                contract = %group.name,
                "No resolvable customer request, contract skipped"
            );
            report.groups_skipped += 1;
            return Ok(());
        };

        let metadata = ContractMetadata::from(group);
        let contract = match Self::linked_contract(conn, first).await? {
            Some(existing) => {
                report.contracts_updated += 1;
                ContractRepo::update_metadata(&mut *conn, &existing.id, &metadata)
                    .await?
                    .unwrap_or(existing)
            }
            None => {
                let created = ContractRepo::create(
                    &mut *conn,
                    &CreateContract {
                        name: group.name.clone(),
                        metadata,
                        project_id: None,
                    },
                )
                .await?;
                report.contracts_created += 1;
                if ContractRepo::count_by_name(&mut *conn, &group.name).await? > 1 {
                    tracing::warn!(
                        contract = %group.name,
                        contract_id = %created.id,
                        "Created a contract whose name is already in use"
                    );
                    report.duplicate_names += 1;
                }
                created
            }
        };

        let mut project_id = None;
        for cr in &requests {
            CustomerRequestRepo::set_contract(&mut *conn, &cr.id, &contract.id).await?;
            report.requests_linked += 1;
            project_id = Some(cr.project_id.as_str());
        }
        if let Some(project_id) = project_id {
            ContractRepo::set_project(&mut *conn, &contract.id, project_id).await?;
        }

        tracing::debug!(
            contract = %group.name,
            contract_id = %contract.id,
            requests = requests.len(),
            "Contract merged"
        );
        Ok(())
    }

    /// Look up every customer request of a group, in row order.
    async fn resolve_requests(
        conn: &mut PgConnection,
        group: &ContractGroup,
        report: &mut ImportReport,
    ) -> Result<Vec<CustomerRequest>, sqlx::Error> {
        let mut requests = Vec::with_capacity(group.customer_request_ids.len());
        for id in &group.customer_request_ids {
            match CustomerRequestRepo::find_by_id(&mut *conn, id).await? {
                Some(cr) => requests.push(cr),
                None => {
                    tracing::warn!(
                        contract = %group.name,
                        customer_request_id = %id,
                        "Unknown customer request in contract sheet"
                    );
                    report.unknown_customer_requests.push(id.clone());
                }
            }
        }
        Ok(requests)
    }

    /// The contract currently linked to `cr`, if any.
    async fn linked_contract(
        conn: &mut PgConnection,
        cr: &CustomerRequest,
    ) -> Result<Option<Contract>, sqlx::Error> {
        match &cr.contract_id {
            Some(id) => ContractRepo::find_by_id(&mut *conn, id).await,
            None => Ok(None),
        }
    }
}
