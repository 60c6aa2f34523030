use std::num::NonZeroUsize;
use std::time::Duration;

use timebook_core::config::{self, ConfigError};
use timebook_core::namespace::{validate_namespace, NamespacePolicy};
use timebook_core::sharding::DEFAULT_SHARD_COUNT;
use timebook_db::repositories::ticket_mirror_repo::DEFAULT_SCHEMA_PREFIX;

/// Tuning for both reconciliation paths.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Number of shards the batch pass splits namespaces into.
    pub shard_count: NonZeroUsize,
    /// Prefix of the per-namespace mirror schemas.
    pub schema_prefix: String,
    /// How projects with several namespaces are resolved.
    pub namespace_policy: NamespacePolicy,
    /// Deadline for the ticket lookup made while creating an entry.
    pub lookup_timeout: Duration,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            schema_prefix: DEFAULT_SCHEMA_PREFIX.to_string(),
            namespace_policy: NamespacePolicy::First,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `RECONCILE_SHARDS`            | `10`    |
    /// | `RECONCILE_SCHEMA_PREFIX`     | `trac_` |
    /// | `RECONCILE_NAMESPACE_POLICY`  | `first` |
    /// | `RECONCILE_LOOKUP_TIMEOUT_MS` | `5000`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let shard_count: NonZeroUsize = config::parse_or("RECONCILE_SHARDS", defaults.shard_count)?;

        let schema_prefix = config::optional("RECONCILE_SCHEMA_PREFIX")
            .unwrap_or(defaults.schema_prefix);
        validate_namespace(&schema_prefix).map_err(|reason| ConfigError::Invalid {
            var: "RECONCILE_SCHEMA_PREFIX",
            value: schema_prefix.clone(),
            reason,
        })?;

        let namespace_policy = match config::optional("RECONCILE_NAMESPACE_POLICY") {
            None => defaults.namespace_policy,
            Some(raw) => NamespacePolicy::from_str(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "RECONCILE_NAMESPACE_POLICY",
                value: raw.clone(),
                reason: "expected 'first' or 'reject_ambiguous'".to_string(),
            })?,
        };

        let lookup_timeout_ms: u64 = config::parse_or(
            "RECONCILE_LOOKUP_TIMEOUT_MS",
            defaults.lookup_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            shard_count,
            schema_prefix,
            namespace_policy,
            lookup_timeout: Duration::from_millis(lookup_timeout_ms),
        })
    }

    /// Same configuration with a different shard count.
    pub fn with_shard_count(mut self, shard_count: NonZeroUsize) -> Self {
        self.shard_count = shard_count;
        self
    }
}
