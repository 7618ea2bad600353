//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Process exit code.
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Routes CLI subcommands to their implementations.
#[derive(Debug, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Create a dispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Check(args) => super::check::CheckCommand::new(args.clone()).execute(ui),
            Commands::Show(args) => super::show::ShowCommand::new(args.clone()).execute(ui),
            Commands::Clear(args) => super::clear::ClearCommand::new(args.clone()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn command_result_constructors() {
        assert_eq!(CommandResult::success().exit_code, 0);
        let failed = CommandResult::failure(2);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 2);
    }

    #[test]
    fn dispatches_clear() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().to_string();
        let cli =
            Cli::try_parse_from(["compat-check", "clear", "acme", "--results-dir", &dir]).unwrap();
        let mut ui = MockUI::new();

        let result = CommandDispatcher::new().dispatch(&cli, &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("Nothing to clear"));
    }
}
