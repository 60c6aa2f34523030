//! Ticket-tracker namespace keys and the policy for choosing among several.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Namespace keys are interpolated into schema names, so only a safe subset
/// of identifier characters is accepted.
static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,48}$").expect("valid regex"));

/// Validate a namespace key before it is stored or used in a query.
pub fn validate_namespace(name: &str) -> Result<(), String> {
    if NAMESPACE_RE.is_match(name) {
        Ok(())
    } else {
        Err(format!(
            "Invalid namespace '{name}'. Use 1-48 letters, digits or underscores"
        ))
    }
}

/// How a project with several tracker namespaces is resolved to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespacePolicy {
    /// Use the alphabetically first namespace.
    #[default]
    First,
    /// Treat projects with more than one namespace as unresolvable.
    RejectAmbiguous,
}

impl NamespacePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::RejectAmbiguous => "reject_ambiguous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first" => Some(Self::First),
            "reject_ambiguous" => Some(Self::RejectAmbiguous),
            _ => None,
        }
    }
}

/// Outcome of resolving a project's namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceChoice<'a> {
    Resolved(&'a str),
    Missing,
    Ambiguous(usize),
}

impl NamespacePolicy {
    /// Pick one namespace from `candidates` (expected sorted ascending).
    pub fn choose<'a>(&self, candidates: &'a [String]) -> NamespaceChoice<'a> {
        match (candidates, self) {
            ([], _) => NamespaceChoice::Missing,
            ([only], _) => NamespaceChoice::Resolved(only),
            ([first, ..], Self::First) => NamespaceChoice::Resolved(first),
            (many, Self::RejectAmbiguous) => NamespaceChoice::Ambiguous(many.len()),
        }
    }
}
