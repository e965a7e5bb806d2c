//! Dependent refresh dispatch.
//!
//! When a tracked file changes, the dispatcher looks the path up in a static
//! [`DependencyTable`] and runs the refresh actions it names.

mod actions;
mod dispatcher;
mod result;
mod table;

#[cfg(test)]
pub use actions::MockRefreshAction;
pub use actions::{
    ActionError, ActionRegistry, CommandAction, CommandSpec, INVALIDATE_CACHE,
    InvalidateCacheAction, RECOMPUTE_STATS, RELOAD_CACHE, RecomputeStatsAction, RefreshAction,
    ReloadCacheAction, SummaryStats,
};
pub use dispatcher::Dispatcher;
pub use result::{ActionOutcome, ActionStatus, DispatchResult};
pub use table::{DependencyEdge, DependencyTable, Resolution};
