//! Hook dispatch
//!
//! Implements the dispatch protocol that feeds hook invocations to the
//! task runner and folds their outcomes into one aggregate status. The
//! aggregate is a bitwise-OR of every invocation's exit status plus a
//! start-failure bit, so zero means every hook started and exited
//! successfully. Callers cannot tell "failed to start" from "ran and
//! failed" by the integer alone; only the diagnostics distinguish them.

use super::resolve::HookResolver;
use crate::runner::{TaskDispatcher, TaskSpec, run_tasks};
use std::path::{Path, PathBuf};

/// Options shared by every invocation in one hook dispatch
#[derive(Debug, Clone)]
pub struct RunHooksOptions {
    /// `NAME=VALUE` entries added to each invocation's environment, in
    /// order; duplicates are kept and later entries shadow earlier ones
    pub env: Vec<String>,
    /// Arguments appended verbatim to each invocation's command line
    pub args: Vec<String>,
    /// Number of hook invocations to run concurrently. Only 1 is
    /// supported today; the field exists for forward extension.
    pub jobs: usize,
    /// File whose contents are piped to each invocation's stdin
    pub stdin_path: Option<PathBuf>,
}

impl Default for RunHooksOptions {
    fn default() -> Self {
        Self {
            env: Vec::new(),
            args: Vec::new(),
            jobs: 1,
            stdin_path: None,
        }
    }
}

impl RunHooksOptions {
    /// Create options with the defaults (serial execution, empty env/args)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one `NAME=VALUE` environment entry
    #[must_use]
    pub fn env(mut self, entry: impl Into<String>) -> Self {
        self.env.push(entry.into());
        self
    }

    /// Append arguments passed verbatim to every invocation
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Pipe the contents of `path` to every invocation's stdin
    #[must_use]
    pub fn stdin_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin_path = Some(path.into());
        self
    }
}

/// One concrete hook to run: its verified executable path
///
/// Exists so the dispatch protocol stays agnostic to how a path was
/// resolved; a future extension may queue several scripts found under the
/// same hook name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHook {
    /// Verified executable path
    pub path: PathBuf,
}

/// Per-dispatch state implementing the dispatch protocol
///
/// `pending` holds the single hook not yet handed to the runner; it is the
/// forward-compatible stand-in for a FIFO ready-queue of hooks.
struct HookDispatch<'a> {
    rc: i32,
    hook_name: &'a str,
    pending: Option<ResolvedHook>,
    options: &'a RunHooksOptions,
}

impl TaskDispatcher for HookDispatch<'_> {
    fn next_task(&mut self) -> Option<TaskSpec> {
        let hook = self.pending.take()?;

        tracing::debug!(hook = self.hook_name, path = %hook.path.display(), "Dispatching hook");

        Some(TaskSpec {
            program: hook.path,
            // Args are passed without expanding, so the hook gets back
            // exactly what the caller put in
            args: self.options.args.clone(),
            env: self.options.env.clone(),
            stdin: self.options.stdin_path.clone(),
            stdout_to_stderr: true,
        })
    }

    fn on_start_failure(&mut self, task: &TaskSpec) {
        self.rc |= 1;
        tracing::error!("Couldn't start hook '{}'", task.program.display());
    }

    fn on_finished(&mut self, _task: TaskSpec, status: i32) {
        self.rc |= status;
    }
}

/// Run an already resolved hook and return the aggregate status
///
/// Zero means the hook started and exited successfully; any nonzero value
/// carries either the hook's exit status or the start-failure bit.
///
/// # Panics
///
/// Panics if `options.jobs != 1`; the single-pending-hook dispatch state
/// cannot yet serve more than one concurrent invocation, so any other
/// value is an internal contract violation rather than a user error.
pub fn run_found_hooks(hook_name: &str, hook_path: &Path, options: &RunHooksOptions) -> i32 {
    assert!(
        options.jobs == 1,
        "hook dispatch does not handle {} concurrent jobs yet",
        options.jobs
    );

    let mut dispatch = HookDispatch {
        rc: 0,
        hook_name,
        pending: Some(ResolvedHook {
            path: hook_path.to_path_buf(),
        }),
        options,
    };

    run_tasks(options.jobs, &mut dispatch, "hook", hook_name);

    dispatch.rc
}

/// Resolve a hook by name and run it if configured
///
/// An unconfigured hook is not an error: the result is 0 and nothing is
/// spawned. Callers that care about absence should resolve the hook
/// themselves and use [`run_found_hooks`].
pub fn run_hooks(hook_name: &str, options: &RunHooksOptions, resolver: &HookResolver) -> i32 {
    let Some(hook_path) = resolver.find_hook(hook_name) else {
        return 0;
    };

    run_found_hooks(hook_name, &hook_path, options)
}
