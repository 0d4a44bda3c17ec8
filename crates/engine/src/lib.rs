//! Processing engine for quarry
//!
//! Hosts the hook dispatch engine: hook resolution, the dispatch protocol
//! that feeds hook invocations to the parallel task runner, and outcome
//! aggregation. The generic task runner itself lives in [`runner`].

pub mod hooks;
pub mod runner;

pub use hooks::{
    AdvisoryTracker, HookResolver, ResolvedHook, RunHooksOptions, run_found_hooks, run_hooks,
};
pub use runner::{TaskDispatcher, TaskSpec, run_tasks};
