//! External tool execution with explicit timeouts.
//!
//! Every external program (git, unzip, composer, phpcs) is described by a
//! [`ToolInvocation`] and executed through a [`ToolRunner`]. The production
//! runner is [`SystemRunner`]; tests swap in [`super::ScriptedRunner`].

use crate::error::{CompatError, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long pipe output is awaited once the child is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Read `pipe` to the end on a background thread.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
    });
    rx
}

/// Output of a drain thread, or empty if it does not finish within `wait`.
fn collect(rx: Option<mpsc::Receiver<String>>, wait: Duration) -> String {
    rx.and_then(|rx| rx.recv_timeout(wait).ok())
        .unwrap_or_default()
}

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program to execute (looked up on PATH when not a path).
    pub program: String,

    /// Arguments, passed without shell interpretation.
    pub args: Vec<String>,

    /// Upper bound on the run time; the child is killed when exceeded.
    pub timeout: Duration,
}

impl ToolInvocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable command line, for logs and error messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Executes external tools.
///
/// Implementations must be shareable across worker threads.
pub trait ToolRunner: Send + Sync {
    /// Run the invocation to completion or until its timeout.
    ///
    /// A non-zero exit is reported as `Ok` with `success == false`; only a
    /// spawn failure or a timeout is an `Err`.
    fn run(&self, invocation: &ToolInvocation) -> Result<CommandResult>;
}

/// Runs tools as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<CommandResult> {
        let start = Instant::now();
        tracing::debug!("Running: {}", invocation.display());

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            tracing::debug!("Failed to spawn {}: {}", invocation.program, e);
            CompatError::SpawnFailed {
                command: invocation.display(),
                message: e.to_string(),
            }
        })?;

        // Drain pipes on their own threads so a chatty child never blocks.
        let stdout_rx = child.stdout.take().map(drain);
        let stderr_rx = child.stderr.take().map(drain);

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() > invocation.timeout {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(
                    "Killed '{}' after {}s",
                    invocation.display(),
                    invocation.timeout.as_secs()
                );
                // Grandchildren may still hold the pipes open. Their reader
                // threads are abandoned after the grace period and exit once
                // the pipe closes.
                collect(stdout_rx, DRAIN_GRACE);
                collect(stderr_rx, DRAIN_GRACE);
                return Err(CompatError::Timeout {
                    command: invocation.display(),
                    timeout: invocation.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let budget = invocation
            .timeout
            .saturating_sub(start.elapsed())
            .max(DRAIN_GRACE);
        let stdout = collect(stdout_rx, budget);
        let stderr = collect(stderr_rx, budget);
        let duration = start.elapsed();

        tracing::debug!(
            "'{}' exited with {:?} in {}ms",
            invocation.program,
            status.code(),
            duration.as_millis()
        );

        if status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}
