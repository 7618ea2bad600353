//! External process execution.

pub mod command;
pub mod mock;

pub use command::{CommandResult, SystemRunner, ToolInvocation, ToolRunner};
pub use mock::{exit_output, ok_output, ScriptedRunner};
