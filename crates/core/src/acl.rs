//! Access-control derivation for time entries.
//!
//! Permissions are computed on every access from three inputs: a baseline
//! CRUD grant table, a rule table of role grants, and the entry's current
//! workflow state. The result is an immutable [`Permissions`] value; nothing
//! here is cached or persisted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::roles::{
    ROLE_ADMINISTRATOR, ROLE_EXTERNAL_DEVELOPER, ROLE_INTERNAL_DEVELOPER,
    ROLE_LOCAL_DEVELOPER, ROLE_LOCAL_PROJECT_MANAGER, ROLE_OWNER, ROLE_PROJECT_MANAGER,
    ROLE_SECRETARY,
};
use crate::workflow::TIME_ENTRY_STATE_NEW;

// ---------------------------------------------------------------------------
// Actions and grants
// ---------------------------------------------------------------------------

/// An action a role may be granted on a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    New,
    View,
    Edit,
    Manage,
    Delete,
    Workflow,
    Listing,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::View => "view",
            Self::Edit => "edit",
            Self::Manage => "manage",
            Self::Delete => "delete",
            Self::Workflow => "workflow",
            Self::Listing => "listing",
        }
    }

    /// Every action, in declaration order.
    pub const ALL: &'static [Action] = &[
        Self::New,
        Self::View,
        Self::Edit,
        Self::Manage,
        Self::Delete,
        Self::Workflow,
        Self::Listing,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(role, action)` allowance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub role: String,
    pub action: Action,
}

impl Grant {
    pub fn new(role: impl Into<String>, action: Action) -> Self {
        Self {
            role: role.into(),
            action,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A grant that applies unconditionally, or only while the entry is in a
/// specific workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantRule {
    pub role: &'static str,
    pub action: Action,
    pub only_in_state: Option<&'static str>,
}

impl GrantRule {
    const fn always(role: &'static str, action: Action) -> Self {
        Self {
            role,
            action,
            only_in_state: None,
        }
    }

    const fn in_state(role: &'static str, action: Action, state: &'static str) -> Self {
        Self {
            role,
            action,
            only_in_state: Some(state),
        }
    }

    fn applies_to(&self, workflow_state: &str) -> bool {
        self.only_in_state.is_none_or(|s| s == workflow_state)
    }
}

/// Grant rules layered on top of the baseline for time entries.
pub const TIME_ENTRY_RULES: &[GrantRule] = &[
    // add
    GrantRule::always(ROLE_LOCAL_DEVELOPER, Action::New),
    GrantRule::always(ROLE_LOCAL_PROJECT_MANAGER, Action::New),
    GrantRule::always(ROLE_EXTERNAL_DEVELOPER, Action::New),
    GrantRule::always(ROLE_INTERNAL_DEVELOPER, Action::New),
    GrantRule::always(ROLE_SECRETARY, Action::New),
    GrantRule::always(ROLE_PROJECT_MANAGER, Action::New),
    // view
    GrantRule::always(ROLE_OWNER, Action::View),
    GrantRule::always(ROLE_PROJECT_MANAGER, Action::View),
    GrantRule::always(ROLE_INTERNAL_DEVELOPER, Action::View),
    // edit
    GrantRule::always(ROLE_PROJECT_MANAGER, Action::Edit),
    GrantRule::always(ROLE_SECRETARY, Action::Manage),
    GrantRule::in_state(ROLE_OWNER, Action::Edit, TIME_ENTRY_STATE_NEW),
    // delete
    GrantRule::in_state(ROLE_OWNER, Action::Delete, TIME_ENTRY_STATE_NEW),
    GrantRule::always(ROLE_PROJECT_MANAGER, Action::Delete),
    // workflow
    GrantRule::always(ROLE_SECRETARY, Action::Workflow),
    GrantRule::always(ROLE_PROJECT_MANAGER, Action::Workflow),
    // listing
    GrantRule::always(ROLE_PROJECT_MANAGER, Action::Listing),
];

/// The CRUD baseline shared by every dashboard entity: administrators may do
/// everything.
pub fn crud_baseline() -> Vec<Grant> {
    Action::ALL
        .iter()
        .map(|&action| Grant::new(ROLE_ADMINISTRATOR, action))
        .collect()
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// The effective grant set of one entity at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Permissions(BTreeSet<Grant>);

impl Permissions {
    /// Whether `role` holds `action`.
    pub fn allows(&self, role: &str, action: Action) -> bool {
        self.0
            .iter()
            .any(|grant| grant.role == role && grant.action == action)
    }

    /// Actions granted to `role`, in [`Action`] order.
    pub fn actions_for(&self, role: &str) -> Vec<Action> {
        let actions: BTreeSet<Action> = self
            .0
            .iter()
            .filter(|grant| grant.role == role)
            .map(|grant| grant.action)
            .collect();
        actions.into_iter().collect()
    }

    /// Roles holding `action`, sorted by name.
    pub fn roles_for(&self, action: Action) -> Vec<&str> {
        let roles: BTreeSet<&str> = self
            .0
            .iter()
            .filter(|grant| grant.action == action)
            .map(|grant| grant.role.as_str())
            .collect();
        roles.into_iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grant> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute the grant set for an entity in `workflow_state`.
///
/// The baseline is copied, never mutated, so callers may share one baseline
/// across requests.
pub fn compute_permissions(
    baseline: &[Grant],
    rules: &[GrantRule],
    workflow_state: &str,
) -> Permissions {
    let mut grants: BTreeSet<Grant> = baseline.iter().cloned().collect();
    grants.extend(
        rules
            .iter()
            .filter(|rule| rule.applies_to(workflow_state))
            .map(|rule| Grant::new(rule.role, rule.action)),
    );
    Permissions(grants)
}

/// Grant set of a time entry in `workflow_state`, using the CRUD baseline.
pub fn time_entry_permissions(workflow_state: &str) -> Permissions {
    compute_permissions(&crud_baseline(), TIME_ENTRY_RULES, workflow_state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
