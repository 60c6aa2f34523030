//! Read access to the per-namespace relational mirror of ticket custom fields.
//!
//! Each tracker namespace `ns` has a schema `<prefix>ns` holding a
//! `ticket_custom (ticket, name, value)` table. Batch reconciliation reads
//! the `customerrequest` field of many tickets across many schemas with one
//! UNIONed statement per shard.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgExecutor;

use crate::models::ticket_mirror::{MirrorRow, TicketRef};

/// Name of the custom field linking a ticket to a customer request.
pub const CUSTOMER_REQUEST_FIELD: &str = "customerrequest";

/// Default schema prefix of mirror schemas.
pub const DEFAULT_SCHEMA_PREFIX: &str = "trac_";

/// Provides read access to mirrored ticket custom fields.
pub struct TicketMirrorRepo;

impl TicketMirrorRepo {
    /// Build the statement for one shard.
    ///
    /// Produces one SELECT per namespace joining its `ticket_custom` table
    /// against the shard's `(time_entry_id, ticket)` pairs, combined with
    /// `UNION`. Returns `None` when the shard references no tickets.
    ///
    /// Namespace keys and `schema_prefix` must already be validated
    /// identifiers; they are additionally quoted here.
    pub fn build_shard_query(
        schema_prefix: &str,
        shard: &BTreeMap<String, Vec<TicketRef>>,
    ) -> Option<String> {
        let selects: Vec<String> = shard
            .iter()
            .filter(|(_, refs)| !refs.is_empty())
            .map(|(namespace, refs)| {
                let values = refs
                    .iter()
                    .map(|r| format!("({}::BIGINT, {})", r.time_entry_id, r.ticket))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "(SELECT c.value AS cr_id, v.tp_id AS tp_id \
                     FROM {schema}.ticket_custom c \
                     JOIN (VALUES {values}) AS v(tp_id, ticket) ON c.ticket = v.ticket \
                     WHERE c.name = '{CUSTOMER_REQUEST_FIELD}' \
                     AND c.value IS NOT NULL AND c.value <> '')",
                    schema = quote_ident(&format!("{schema_prefix}{namespace}")),
                )
            })
            .collect();

        if selects.is_empty() {
            None
        } else {
            Some(selects.join("\nUNION\n"))
        }
    }

    /// Execute a statement produced by [`Self::build_shard_query`].
    pub async fn fetch_shard(
        executor: impl PgExecutor<'_>,
        sql: &str,
    ) -> Result<Vec<MirrorRow>, sqlx::Error> {
        sqlx::query_as::<_, MirrorRow>(sql).fetch_all(executor).await
    }

    /// Namespaces that have a mirror table, with `schema_prefix` stripped.
    pub async fn list_mirrored_namespaces(
        executor: impl PgExecutor<'_>,
        schema_prefix: &str,
    ) -> Result<BTreeSet<String>, sqlx::Error> {
        let schemas: Vec<String> = sqlx::query_scalar(
            "SELECT table_schema::TEXT FROM information_schema.tables \
             WHERE table_name = 'ticket_custom' \
             AND left(table_schema, length($1)) = $1",
        )
        .bind(schema_prefix)
        .fetch_all(executor)
        .await?;

        Ok(schemas
            .into_iter()
            .filter_map(|s| s.strip_prefix(schema_prefix).map(str::to_string))
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Quote a PostgreSQL identifier.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
