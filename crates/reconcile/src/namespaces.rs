//! Project → tracker namespace resolution.

use std::collections::HashMap;

use timebook_core::namespace::{NamespaceChoice, NamespacePolicy};
use timebook_db::models::project::Trac;

/// Namespaces of every project, each list sorted by name.
#[derive(Debug, Default)]
pub struct NamespaceIndex {
    by_project: HashMap<String, Vec<String>>,
}

impl NamespaceIndex {
    /// Build the index from `tracs` rows (any order).
    pub fn from_tracs(tracs: impl IntoIterator<Item = Trac>) -> Self {
        let mut by_project: HashMap<String, Vec<String>> = HashMap::new();
        for trac in tracs {
            by_project
                .entry(trac.project_id)
                .or_default()
                .push(trac.trac_name);
        }
        for names in by_project.values_mut() {
            names.sort();
        }
        Self { by_project }
    }

    pub fn resolve(&self, project_id: &str, policy: NamespacePolicy) -> NamespaceChoice<'_> {
        match self.by_project.get(project_id) {
            Some(names) => policy.choose(names),
            None => NamespaceChoice::Missing,
        }
    }
}
