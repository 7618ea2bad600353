//! The `clear` command.

use crate::cli::args::LedgerArgs;
use crate::error::Result;
use crate::ledger::ResultStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Removes a stored ledger so the next check starts fresh.
pub struct ClearCommand {
    args: LedgerArgs,
}

impl ClearCommand {
    /// Create a clear command.
    pub fn new(args: LedgerArgs) -> Self {
        Self { args }
    }
}

impl Command for ClearCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = ResultStore::ledger_path(&self.args.results_dir, &self.args.subrepo);
        if ResultStore::clear(&self.args.results_dir, &self.args.subrepo)? {
            ui.success(&format!("Removed {}", path.display()));
        } else {
            ui.message(&format!("Nothing to clear at {}", path.display()));
        }
        Ok(CommandResult::success())
    }
}
