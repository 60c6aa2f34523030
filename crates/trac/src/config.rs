use std::time::Duration;

use timebook_core::config::{self, ConfigError};

/// Connection settings for the tracker's JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct TracConfig {
    /// Base URL; each namespace is served under `{base_url}/{namespace}`.
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl TracConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var             | Default  |
    /// |---------------------|----------|
    /// | `TRAC_BASE_URL`     | required |
    /// | `TRAC_USERNAME`     | unset    |
    /// | `TRAC_PASSWORD`     | unset    |
    /// | `TRAC_TIMEOUT_SECS` | `5`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = config::required("TRAC_BASE_URL")?;
        let timeout_secs: u64 = config::parse_or("TRAC_TIMEOUT_SECS", 5)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: config::optional("TRAC_USERNAME"),
            password: config::optional("TRAC_PASSWORD"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
