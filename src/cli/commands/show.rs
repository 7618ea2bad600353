//! The `show` command.

use crate::cli::args::LedgerArgs;
use crate::error::Result;
use crate::ledger::{summarize, ResultStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Prints a stored ledger without touching the network.
pub struct ShowCommand {
    args: LedgerArgs,
}

impl ShowCommand {
    /// Create a show command.
    pub fn new(args: LedgerArgs) -> Self {
        Self { args }
    }
}

impl Command for ShowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(ledger) = ResultStore::try_load(&self.args.results_dir, &self.args.subrepo)?
        else {
            ui.warning(&format!(
                "No results stored for {} in {}",
                self.args.subrepo,
                self.args.results_dir.display()
            ));
            return Ok(CommandResult::failure(1));
        };

        ui.show_table(&ledger);
        ui.finish_run(&self.args.subrepo, &summarize(&ledger));
        Ok(CommandResult::success())
    }
}
