//! Mock UI implementation for testing.
//!
//! `MockUI` implements [`UserInterface`] and captures every interaction for
//! later assertion.
//!
//! # Example
//!
//! ```
//! use compat_check::constraint::ConstraintStatus;
//! use compat_check::ledger::{FinalResult, ScanVerdict};
//! use compat_check::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_verdict(
//!     &ScanVerdict::new("acme/a", ConstraintStatus::Compatible, ">=8.1", FinalResult::Ok),
//!     false,
//! );
//!
//! assert_eq!(ui.rows()[0].0.package, "acme/a");
//! ```

use crate::ledger::{Ledger, ScanVerdict, Summary};

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Captures UI interactions.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    runs: Vec<usize>,
    rows: Vec<(ScanVerdict, bool)>,
    running: Vec<Summary>,
    finals: Vec<(String, Summary)>,
    tables: Vec<usize>,
}

impl MockUI {
    /// Create a MockUI in Normal mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MockUI with a specific mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Spinner start messages.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Totals passed to `start_run`.
    pub fn runs(&self) -> &[usize] {
        &self.runs
    }

    /// Verdict rows with their cached flag, in display order.
    pub fn rows(&self) -> &[(ScanVerdict, bool)] {
        &self.rows
    }

    /// Running summaries, one per verdict.
    pub fn running_summaries(&self) -> &[Summary] {
        &self.running
    }

    /// Final summary of the last run.
    pub fn final_summary(&self) -> Option<&(String, Summary)> {
        self.finals.last()
    }

    /// Row counts of rendered tables.
    pub fn tables(&self) -> &[usize] {
        &self.tables
    }

    /// Check if a message, success, warning or error contains `text`.
    pub fn has_message(&self, text: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .any(|m| m.contains(text))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }

    fn start_run(&mut self, total: usize) {
        self.runs.push(total);
    }

    fn show_verdict(&mut self, verdict: &ScanVerdict, cached: bool) {
        self.rows.push((verdict.clone(), cached));
    }

    fn show_running_summary(&mut self, _subrepo: &str, summary: &Summary) {
        self.running.push(*summary);
    }

    fn finish_run(&mut self, subrepo: &str, summary: &Summary) {
        self.finals.push((subrepo.to_string(), *summary));
    }

    fn show_table(&mut self, ledger: &Ledger) {
        self.tables.push(ledger.len());
    }
}

/// Spinner that does nothing.
#[derive(Debug)]
pub struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
}
