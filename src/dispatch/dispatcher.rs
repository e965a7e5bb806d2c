//! Dependent refresh dispatcher.
//!
//! Resolves a changed path against the [`DependencyTable`] and runs each
//! selected action in turn. Failures are isolated per action and reported in
//! the [`DispatchResult`].

use chrono::Utc;
use tracing::{info, warn};

use super::actions::{ActionError, ActionRegistry};
use super::result::{ActionOutcome, ActionStatus, DispatchResult};
use super::table::DependencyTable;
use crate::docs::{DocumentCache, RegistryError};

/// Notifies dependent subsystems that a tracked file changed.
pub struct Dispatcher {
    table: DependencyTable,
    actions: ActionRegistry,
}

impl Dispatcher {
    pub fn new(table: DependencyTable, actions: ActionRegistry) -> Self {
        Self { table, actions }
    }

    pub fn table(&self) -> &DependencyTable {
        &self.table
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn dispatch(&self, changed_path: &str, cache: &DocumentCache) -> DispatchResult {
        self.dispatch_as("dispatch", changed_path, cache)
    }

    /// Run every action the table selects for `changed_path`.
    ///
    /// A failing action is logged and recorded; the remaining actions still
    /// run. `success` is true only when every attempted action succeeded.
    pub fn dispatch_as(
        &self,
        command: &str,
        changed_path: &str,
        cache: &DocumentCache,
    ) -> DispatchResult {
        let resolution = self.table.resolve(changed_path);
        info!(
            path = changed_path,
            categories = ?resolution.categories,
            actions = ?resolution.actions,
            "Dispatching refresh"
        );

        let mut outcomes = Vec::with_capacity(resolution.actions.len());
        for name in &resolution.actions {
            let result = match self.actions.get(name) {
                Some(action) => action.refresh(changed_path, cache),
                None => Err(ActionError::UnknownAction(name.clone())),
            };

            let outcome = match result {
                Ok(detail) => ActionOutcome {
                    file: changed_path.to_string(),
                    action: name.clone(),
                    status: ActionStatus::Success,
                    detail: Some(detail).filter(|d| !d.is_empty()),
                },
                Err(e) => {
                    let failure = RegistryError::DispatchActionFailed {
                        action: name.clone(),
                        message: e.to_string(),
                    };
                    warn!(path = changed_path, error = %failure, "Refresh action failed");
                    ActionOutcome {
                        file: changed_path.to_string(),
                        action: name.clone(),
                        status: ActionStatus::Failed,
                        detail: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let success = outcomes.iter().all(|o| o.status == ActionStatus::Success);

        DispatchResult {
            command: command.to_string(),
            timestamp: Utc::now(),
            changed_file: changed_path.to_string(),
            categories: resolution.categories,
            dependencies_updated: outcomes,
            success,
        }
    }
}
