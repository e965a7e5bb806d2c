//! Standards side-table.
//!
//! Records which standards each component claims to satisfy. Entries are
//! added by explicit [`StandardsRegistry::register`] calls, never discovered
//! by inspecting components.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct StandardsRegistry {
    by_component: BTreeMap<String, BTreeSet<String>>,
}

/// One component and the standards it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardsEntry {
    pub component: String,
    pub standards: Vec<String>,
}

impl StandardsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `component` satisfies `standard`. Returns false if the
    /// pair was already registered.
    pub fn register(&mut self, component: &str, standard: &str) -> bool {
        self.by_component
            .entry(component.to_string())
            .or_default()
            .insert(standard.to_string())
    }

    pub fn register_all<'a>(
        &mut self,
        component: &str,
        standards: impl IntoIterator<Item = &'a String>,
    ) {
        for standard in standards {
            self.register(component, standard);
        }
    }

    pub fn standards_for(&self, component: &str) -> Vec<&str> {
        self.by_component
            .get(component)
            .map(|s| s.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn components_for(&self, standard: &str) -> Vec<&str> {
        self.by_component
            .iter()
            .filter(|(_, standards)| standards.contains(standard))
            .map(|(component, _)| component.as_str())
            .collect()
    }

    pub fn entries(&self) -> Vec<StandardsEntry> {
        self.by_component
            .iter()
            .map(|(component, standards)| StandardsEntry {
                component: component.clone(),
                standards: standards.iter().cloned().collect(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_component.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = StandardsRegistry::new();
        assert!(registry.register("detector", "change-tracking"));
        assert!(registry.register("detector", "at-least-once"));
        assert!(!registry.register("detector", "change-tracking"));
        registry.register("fingerprint-store", "at-least-once");

        assert_eq!(
            registry.standards_for("detector"),
            vec!["at-least-once", "change-tracking"]
        );
        assert_eq!(
            registry.components_for("at-least-once"),
            vec!["detector", "fingerprint-store"]
        );
        assert!(registry.standards_for("unknown").is_empty());
    }

    #[test]
    fn test_entries_sorted_by_component() {
        let mut registry = StandardsRegistry::new();
        registry.register_all("loader", &["utf8-text".to_string()]);
        registry.register("cache", "single-record-per-path");

        let entries = registry.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].component, "cache");
        assert_eq!(entries[1].standards, vec!["utf8-text"]);
    }
}
