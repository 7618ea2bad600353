//! Terminal output.
//!
//! - [`UserInterface`] trait so the pipeline can run against [`MockUI`]
//! - [`TerminalUI`] for real terminals and pipes
//! - [`report`] maps verdict enums to styled cells, rows and summaries
//!
//! # Example
//!
//! ```
//! use compat_check::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Checking acme");
//! assert_eq!(ui.messages(), ["Checking acme".to_string()]);
//! ```

pub mod mock;
pub mod output;
pub mod report;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use spinner::{ProgressSpinner, RunProgress};
pub use table::Table;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, Theme};

use crate::ledger::{Ledger, ScanVerdict, Summary};

/// Everything the commands print goes through this trait.
pub trait UserInterface {
    /// Current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Plain message.
    fn message(&mut self, msg: &str);

    /// Success message.
    fn success(&mut self, msg: &str);

    /// Warning message.
    fn warning(&mut self, msg: &str);

    /// Error message; shown in every mode.
    fn error(&mut self, msg: &str);

    /// Header line.
    fn show_header(&mut self, title: &str);

    /// Spinner for a single blocking step.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Begin a run over `total` packages.
    fn start_run(&mut self, total: usize);

    /// One finished package. `cached` marks rows replayed from the ledger.
    fn show_verdict(&mut self, verdict: &ScanVerdict, cached: bool);

    /// Running summary after each verdict.
    fn show_running_summary(&mut self, subrepo: &str, summary: &Summary);

    /// End of a run; prints the final summary line.
    fn finish_run(&mut self, subrepo: &str, summary: &Summary);

    /// Whole ledger as a table.
    fn show_table(&mut self, ledger: &Ledger);
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the step as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the step as failed.
    fn finish_error(&mut self, msg: &str);
}
