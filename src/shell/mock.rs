//! Scripted tool runner for testing.
//!
//! `ScriptedRunner` implements [`ToolRunner`] without spawning processes.
//! Each invocation is recorded and answered by a caller-supplied handler,
//! so tests can assert exactly which external tools a code path touched.
//!
//! # Example
//!
//! ```
//! use compat_check::shell::{CommandResult, ScriptedRunner, ToolInvocation, ToolRunner};
//! use std::time::Duration;
//!
//! let runner = ScriptedRunner::new(|inv| {
//!     if inv.program == "git" {
//!         Ok(CommandResult::failure(Some(128), String::new(), "denied".into(), Duration::ZERO))
//!     } else {
//!         Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
//!     }
//! });
//!
//! let result = runner.run(&ToolInvocation::new("git", Duration::from_secs(1))).unwrap();
//! assert!(!result.success);
//! assert_eq!(runner.count("git"), 1);
//! ```

use std::sync::Mutex;
use std::time::Duration;

use crate::error::Result;

use super::command::{CommandResult, ToolInvocation, ToolRunner};

type Handler = Box<dyn Fn(&ToolInvocation) -> Result<CommandResult> + Send + Sync>;

/// Records invocations and answers them from a handler closure.
pub struct ScriptedRunner {
    handler: Handler,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl ScriptedRunner {
    /// Create a runner that answers every invocation with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ToolInvocation) -> Result<CommandResult> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runner where every tool succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::new(|_| Ok(ok_output("")))
    }

    /// All invocations seen so far, in order.
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of invocations of `program`.
    pub fn count(&self, program: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|inv| inv.program == program)
            .count()
    }

    /// Total number of invocations.
    pub fn total(&self) -> usize {
        self.invocations().len()
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<CommandResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        (self.handler)(invocation)
    }
}

/// Successful result with the given stdout.
pub fn ok_output(stdout: &str) -> CommandResult {
    CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
}

/// Failed result with the given exit code and stdout.
pub fn exit_output(code: i32, stdout: &str) -> CommandResult {
    CommandResult::failure(Some(code), stdout.to_string(), String::new(), Duration::ZERO)
}
