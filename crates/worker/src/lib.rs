//! Offline reconciliation jobs: the batch pass and contract import.
//!
//! Neither job takes locks. Do not run two jobs against the same database at
//! the same time, and do not run one while `POST /api/v1/reconciliation` or
//! `POST /api/v1/contracts/import` is in flight: overlapping passes can
//! interleave writes to the same time entries.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use timebook_core::contract_rows::ContractRow;
use timebook_db::DbPool;
use timebook_reconcile::{BatchReconciler, ContractImporter, ReconcileConfig};

const LONG_ABOUT: &str = "Offline reconciliation jobs for timebook.\n\n\
Jobs take no locks: schedule them so that no two jobs (or a job and an \
import or reconciliation request to the API) overlap on the same database. \
A failed job leaves no partial writes and can simply be re-run.";

#[derive(Debug, Parser)]
#[command(name = "timebook-worker")]
#[command(about = "Offline reconciliation jobs for timebook", long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Re-derive contract attribution for every ticketed time entry.
    Reconcile {
        /// Number of shards (overrides RECONCILE_SHARDS)
        #[arg(long)]
        shards: Option<NonZeroUsize>,
    },
    /// Merge a contract sheet (JSON array of rows), then reconcile.
    ImportContracts {
        /// Path to the exported rows
        rows: PathBuf,

        /// Number of shards (overrides RECONCILE_SHARDS)
        #[arg(long)]
        shards: Option<NonZeroUsize>,
    },
}

/// Run `command` and return its report as pretty JSON.
pub async fn execute(
    command: Command,
    pool: &DbPool,
    config: ReconcileConfig,
) -> anyhow::Result<String> {
    match command {
        Command::Reconcile { shards } => {
            let batch = BatchReconciler::new(with_shards(config, shards));
            let report = batch.run(pool).await.context("batch reconciliation failed")?;
            if report.integrity_warnings() > 0 {
                tracing::warn!(
                    warnings = report.integrity_warnings(),
                    "Reconciliation finished with integrity warnings"
                );
            }
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Command::ImportContracts { rows, shards } => {
            let rows = load_rows(&rows)?;
            tracing::info!(rows = rows.len(), "Loaded contract rows");
            let importer = ContractImporter::new(BatchReconciler::new(with_shards(config, shards)));
            let report = importer
                .import(pool, &rows)
                .await
                .context("contract import failed")?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

fn with_shards(config: ReconcileConfig, shards: Option<NonZeroUsize>) -> ReconcileConfig {
    match shards {
        Some(n) => config.with_shard_count(n),
        None => config,
    }
}

/// Read a JSON array of contract rows.
pub fn load_rows(path: &Path) -> anyhow::Result<Vec<ContractRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of contract rows", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_import_command() {
        let cli = Cli::try_parse_from([
            "timebook-worker",
            "import-contracts",
            "rows.json",
            "--shards",
            "4",
        ])
        .unwrap();
        match cli.command {
            Command::ImportContracts { rows, shards } => {
                assert_eq!(rows, PathBuf::from("rows.json"));
                assert_eq!(shards.map(NonZeroUsize::get), Some(4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_shards_is_rejected() {
        assert!(Cli::try_parse_from(["timebook-worker", "reconcile", "--shards", "0"]).is_err());
    }

    #[test]
    fn loads_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"titolocommessa": "Acme Q1", "gg": "20", "cr_id": "CR-7", "stato": "A"}}]"#
        )
        .unwrap();

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.as_deref(), Some("Acme Q1"));
        assert_eq!(rows[0].days, Some(20.0));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"an array\"}}").unwrap();

        let err = load_rows(file.path()).unwrap_err();
        assert!(err.to_string().contains("is not a JSON array of contract rows"));
    }
}
