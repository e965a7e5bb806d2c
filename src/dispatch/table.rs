//! Static dependency table.
//!
//! Maps categories of changed files to the refresh actions that depend on
//! them. A category matches when any of its patterns is a substring of the
//! changed path. When several categories match, the actions are the union of
//! all of them in table order, each action kept at its first occurrence.
//!
//! The union is then ordered by phase, keeping table order within a phase:
//!
//! ```text
//! 0  invalidate-cache
//! 1  reload-cache
//! 2  any other action
//! 3  recompute-stats
//! ```
//!
//! so statistics always see the cache after every reload has happened.

use serde::{Deserialize, Serialize};

use super::actions::{INVALIDATE_CACHE, RECOMPUTE_STATS, RELOAD_CACHE};

/// One row of the dependency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub category: String,
    pub patterns: Vec<String>,
    pub actions: Vec<String>,
}

impl DependencyEdge {
    pub fn new(category: &str, patterns: &[&str], actions: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        self.patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && normalized.contains(pattern.as_str()))
    }
}

/// Categories and actions selected for one changed path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub categories: Vec<String>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTable {
    edges: Vec<DependencyEdge>,
}

impl DependencyTable {
    pub fn new(edges: Vec<DependencyEdge>) -> Self {
        Self { edges }
    }

    /// Built-in table used when configuration does not supply one.
    pub fn default_edges() -> Vec<DependencyEdge> {
        vec![
            DependencyEdge::new(
                "dependency-map",
                &["dependency_map", "dependencies.json"],
                &[INVALIDATE_CACHE, RECOMPUTE_STATS],
            ),
            DependencyEdge::new("module", &["modules/"], &[RELOAD_CACHE, RECOMPUTE_STATS]),
            DependencyEdge::new("document", &[".md"], &[RELOAD_CACHE]),
        ]
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        let mut resolution = Resolution::default();

        for edge in self.edges.iter().filter(|e| e.matches(path)) {
            resolution.categories.push(edge.category.clone());
            for action in &edge.actions {
                if !resolution.actions.contains(action) {
                    resolution.actions.push(action.clone());
                }
            }
        }

        resolution.actions.sort_by_key(|action| phase(action));
        resolution
    }
}

fn phase(action: &str) -> u8 {
    match action {
        INVALIDATE_CACHE => 0,
        RELOAD_CACHE => 1,
        RECOMPUTE_STATS => 3,
        _ => 2,
    }
}

impl Default for DependencyTable {
    fn default() -> Self {
        Self::new(Self::default_edges())
    }
}
