//! Terminal UI.

use super::report::{ledger_table, summary_line, verdict_line};
use super::{
    OutputMode, ProgressSpinner, RunProgress, SpinnerHandle, Theme, UserInterface,
};
use crate::ledger::{Ledger, ScanVerdict, Summary};

/// Writes to stdout, styled when the terminal supports it.
pub struct TerminalUI {
    theme: Theme,
    mode: OutputMode,
    progress: Option<RunProgress>,
    /// The progress bar is drawn, so it carries the running summary.
    live_progress: bool,
}

impl TerminalUI {
    /// Create a terminal UI.
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        Self {
            theme: Theme::for_terminal(no_color),
            mode,
            progress: None,
            live_progress: false,
        }
    }

    fn line(&self, text: &str) {
        match &self.progress {
            Some(progress) => progress.println(text),
            None => println!("{}", text),
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_rows() {
            self.line(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_rows() {
            self.line(&self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        self.line(&self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        if let Some(progress) = self.progress.take() {
            progress.finish();
        }
        self.live_progress = false;
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_rows() {
            self.line(&self.theme.format_header(title));
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_rows() && console::Term::stderr().is_term() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn start_run(&mut self, total: usize) {
        let visible = self.mode.shows_rows() && console::Term::stderr().is_term();
        self.live_progress = visible;
        self.progress = Some(if visible {
            RunProgress::new(total)
        } else {
            RunProgress::hidden()
        });
    }

    fn show_verdict(&mut self, verdict: &ScanVerdict, cached: bool) {
        if !self.mode.shows_rows() {
            return;
        }
        let mut text = verdict_line(verdict, &self.theme);
        if cached {
            text.push_str(&format!("  {}", self.theme.dim.apply_to("(cached)")));
        }
        self.line(&text);
    }

    fn show_running_summary(&mut self, subrepo: &str, summary: &Summary) {
        let line = summary_line(subrepo, summary);
        if let Some(progress) = &self.progress {
            progress.advance(&line);
        }
        // Without a drawn bar the summary goes out as a plain line.
        if !self.live_progress && self.mode.shows_rows() {
            self.line(&line);
        }
    }

    fn finish_run(&mut self, subrepo: &str, summary: &Summary) {
        if let Some(progress) = self.progress.take() {
            progress.finish();
        }
        self.live_progress = false;
        println!("{}", summary_line(subrepo, summary));
    }

    fn show_table(&mut self, ledger: &Ledger) {
        if self.mode.shows_rows() {
            self.line(&ledger_table(ledger, &self.theme).render());
        }
    }
}
