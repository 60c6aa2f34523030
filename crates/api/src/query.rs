//! Query parameter types shared by handler modules.

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::error::AppError;

/// `?project_id=` filter for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub project_id: Option<String>,
}

/// Filters for `GET /time-entries`. Exactly one must be given.
#[derive(Debug, Default, Deserialize)]
pub struct TimeEntryFilter {
    pub project_id: Option<String>,
    pub contract_id: Option<String>,
}

/// `?shards=` override for endpoints that run a batch pass.
#[derive(Debug, Default, Deserialize)]
pub struct ShardParams {
    pub shards: Option<usize>,
}

impl ShardParams {
    /// The requested shard count, if any. Zero is rejected.
    pub fn shard_count(&self) -> Result<Option<NonZeroUsize>, AppError> {
        match self.shards {
            None => Ok(None),
            Some(n) => NonZeroUsize::new(n)
                .map(Some)
                .ok_or_else(|| AppError::BadRequest("shards must be at least 1".into())),
        }
    }
}
