//! Generic bounded-concurrency task runner
//!
//! Spawns external processes on behalf of a [`TaskDispatcher`], which feeds
//! it work and receives outcome notifications. The runner owns process
//! plumbing only; which tasks run, and what their results mean, is entirely
//! the dispatcher's business.
//!
//! Tasks are handed out and their finish notifications delivered in FIFO
//! order, with at most `max_concurrency` children alive at a time.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::ExitStatus;

/// One concrete process invocation requested by a dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Program to execute (argv\[0\])
    pub program: PathBuf,
    /// Arguments passed verbatim after the program
    pub args: Vec<String>,
    /// `NAME=VALUE` entries appended to the inherited process environment,
    /// applied in order (later entries shadow earlier ones)
    pub env: Vec<String>,
    /// File whose contents become the child's stdin; stdin is closed
    /// (null) when absent
    pub stdin: Option<PathBuf>,
    /// Redirect the child's stdout onto the caller's stderr channel
    pub stdout_to_stderr: bool,
}

/// Dispatch protocol driven by [`run_tasks`]
///
/// The runner pulls work with [`next_task`](Self::next_task) and reports
/// every outcome through exactly one of the two notification methods:
/// [`on_start_failure`](Self::on_start_failure) if the process could not be
/// spawned, [`on_finished`](Self::on_finished) once a spawned process
/// terminates.
pub trait TaskDispatcher {
    /// Produce the next task to run, or `None` when no work remains
    fn next_task(&mut self) -> Option<TaskSpec>;

    /// Called when a task's process could not be started at all
    fn on_start_failure(&mut self, task: &TaskSpec);

    /// Called exactly once per started task with its termination status
    /// (0 = success; on Unix, death by signal folds as 128 + signal)
    fn on_finished(&mut self, task: TaskSpec, status: i32);
}

/// Drain a dispatcher's tasks with bounded concurrency
///
/// Blocks until every task the dispatcher hands out has been started (or
/// failed to start) and every started task has terminated and been
/// reported back. `kind` and `context` label the work for diagnostics.
///
/// # Panics
///
/// Panics if `max_concurrency` is zero.
pub fn run_tasks<D: TaskDispatcher>(
    max_concurrency: usize,
    dispatcher: &mut D,
    kind: &str,
    context: &str,
) {
    assert!(max_concurrency >= 1, "max_concurrency must be at least 1");

    let span = tracing::debug_span!("run_tasks", kind, context);
    let _guard = span.enter();

    let mut in_flight: VecDeque<(duct::Handle, TaskSpec)> = VecDeque::new();
    let mut drained = false;

    loop {
        // Keep the in-flight window full, FIFO
        while !drained && in_flight.len() < max_concurrency {
            match dispatcher.next_task() {
                Some(spec) => match spawn(&spec) {
                    Ok(handle) => in_flight.push_back((handle, spec)),
                    Err(e) => {
                        tracing::debug!(
                            program = %spec.program.display(),
                            error = %e,
                            "Failed to start task"
                        );
                        dispatcher.on_start_failure(&spec);
                    }
                },
                None => drained = true,
            }
        }

        // Notify finishes in hand-out order
        let Some((handle, spec)) = in_flight.pop_front() else {
            break;
        };
        let status = wait_status(&handle, &spec);
        dispatcher.on_finished(spec, status);
    }
}

/// Spawn a task's process without waiting for it
fn spawn(spec: &TaskSpec) -> std::io::Result<duct::Handle> {
    let mut expr = duct::cmd(spec.program.as_os_str(), &spec.args).unchecked();

    for entry in &spec.env {
        // Entries without '=' set the variable to the empty string
        let (name, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
        expr = expr.env(name, value);
    }

    expr = match &spec.stdin {
        Some(path) => expr.stdin_path(path),
        None => expr.stdin_null(),
    };

    if spec.stdout_to_stderr {
        expr = expr.stdout_to_stderr();
    }

    expr.start()
}

/// Wait for a spawned task and fold its termination into an exit code
fn wait_status(handle: &duct::Handle, spec: &TaskSpec) -> i32 {
    match handle.wait() {
        Ok(output) => exit_code(output.status),
        Err(e) => {
            tracing::error!(
                program = %spec.program.display(),
                error = %e,
                "Failed waiting for task"
            );
            1
        }
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Dispatcher that feeds a fixed queue of tasks and records outcomes
    struct QueueDispatcher {
        queue: VecDeque<TaskSpec>,
        started_failures: Vec<PathBuf>,
        finished: Vec<(PathBuf, i32)>,
    }

    impl QueueDispatcher {
        fn new(tasks: Vec<TaskSpec>) -> Self {
            Self {
                queue: tasks.into(),
                started_failures: Vec::new(),
                finished: Vec::new(),
            }
        }
    }

    impl TaskDispatcher for QueueDispatcher {
        fn next_task(&mut self) -> Option<TaskSpec> {
            self.queue.pop_front()
        }

        fn on_start_failure(&mut self, task: &TaskSpec) {
            self.started_failures.push(task.program.clone());
        }

        fn on_finished(&mut self, task: TaskSpec, status: i32) {
            self.finished.push((task.program, status));
        }
    }

    fn sh_task(script: &str) -> TaskSpec {
        TaskSpec {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            env: Vec::new(),
            stdin: None,
            stdout_to_stderr: false,
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_serial_tasks_finish_in_fifo_order() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("order.log");
        let tasks = (1..=3)
            .map(|i| sh_task(&format!("echo {i} >> {}", log.display())))
            .collect();

        let mut dispatcher = QueueDispatcher::new(tasks);
        run_tasks(1, &mut dispatcher, "test", "fifo");

        assert_eq!(dispatcher.finished.len(), 3);
        assert!(dispatcher.started_failures.is_empty());
        assert_eq!(fs::read_to_string(&log).unwrap(), "1\n2\n3\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_reported() {
        let mut dispatcher = QueueDispatcher::new(vec![sh_task("exit 7")]);
        run_tasks(1, &mut dispatcher, "test", "status");

        assert_eq!(dispatcher.finished, vec![(PathBuf::from("sh"), 7)]);
    }

    #[test]
    fn test_spawn_failure_notifies_dispatcher() {
        let missing = PathBuf::from("/nonexistent/quarry-test-program");
        let task = TaskSpec {
            program: missing.clone(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: None,
            stdout_to_stderr: false,
        };

        let mut dispatcher = QueueDispatcher::new(vec![task]);
        run_tasks(1, &mut dispatcher, "test", "spawn-failure");

        assert_eq!(dispatcher.started_failures, vec![missing]);
        assert!(dispatcher.finished.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_env_entries_applied_in_order() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("env.out");
        let mut task = sh_task(&format!("echo \"$MARKER\" > {}", out.display()));
        // Last entry wins
        task.env = vec!["MARKER=first".to_string(), "MARKER=second".to_string()];

        let mut dispatcher = QueueDispatcher::new(vec![task]);
        run_tasks(1, &mut dispatcher, "test", "env");

        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "second");
    }

    #[test]
    #[should_panic(expected = "max_concurrency")]
    fn test_zero_concurrency_panics() {
        let mut dispatcher = QueueDispatcher::new(Vec::new());
        run_tasks(0, &mut dispatcher, "test", "zero");
    }
}
