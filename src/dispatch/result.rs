//! Dispatch result types.
//!
//! Serialized form:
//!
//! ```json
//! {
//!   "command": "process",
//!   "timestamp": "2026-01-01T00:00:00Z",
//!   "changed_file": "docs/dependency_map.json",
//!   "categories": ["dependency-map"],
//!   "dependencies_updated": [
//!     {"file": "docs/dependency_map.json", "action": "invalidate-cache", "status": "success"}
//!   ],
//!   "success": true
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Success => f.write_str("success"),
            ActionStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Status of one attempted refresh action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub file: String,
    pub action: String,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub changed_file: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub dependencies_updated: Vec<ActionOutcome>,
    pub success: bool,
}

impl DispatchResult {
    /// Names of every action attempted, in dispatch order.
    pub fn actions_attempted(&self) -> Vec<&str> {
        self.dependencies_updated
            .iter()
            .map(|o| o.action.as_str())
            .collect()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.dependencies_updated
            .iter()
            .filter(|o| o.status == ActionStatus::Failed)
    }
}
