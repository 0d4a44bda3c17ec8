//! Hook dispatch engine
//!
//! Locates user-supplied hook executables at well-known lifecycle points
//! and runs them through the generic task runner, folding their outcomes
//! into a single aggregate status.
//!
//! ## Module Organization
//!
//! - `resolve`: hook name → verified executable path, with a one-shot
//!   advisory for hooks that exist but are not executable
//! - `dispatch`: the dispatch protocol feeding invocations to the runner,
//!   plus the `run_hooks`/`run_found_hooks` entry points

pub mod dispatch;
pub mod resolve;

// Re-export main types for convenience
pub use dispatch::{ResolvedHook, RunHooksOptions, run_found_hooks, run_hooks};
pub use resolve::{AdvisoryTracker, HookResolver};
