//! Presentation of verdicts.
//!
//! Ledger data carries plain enums; styling happens only here.

use crate::constraint::ConstraintStatus;
use crate::ledger::{FinalResult, Ledger, ScanVerdict, Summary};

use super::table::Table;
use super::theme::Theme;

/// Column headers of the verdict table.
pub const HEADERS: [&str; 4] = ["Package", "Status", "Constraint", "Final result"];

/// Styled status word.
pub fn status_cell(status: ConstraintStatus, theme: &Theme) -> String {
    let style = match status {
        ConstraintStatus::Compatible => &theme.success,
        ConstraintStatus::Risky | ConstraintStatus::Unknown => &theme.warning,
        ConstraintStatus::Incompatible => &theme.error,
    };
    style.apply_to(status.label()).to_string()
}

/// Styled final result; anything but OK is an error.
pub fn result_cell(result: &FinalResult, theme: &Theme) -> String {
    let style = if result.is_ok() {
        &theme.success
    } else {
        &theme.error
    };
    style.apply_to(result.as_str()).to_string()
}

/// Table cells for one verdict.
pub fn verdict_cells(verdict: &ScanVerdict, theme: &Theme) -> Vec<String> {
    vec![
        verdict.package.clone(),
        status_cell(verdict.status, theme),
        verdict.constraint.clone(),
        result_cell(&verdict.result, theme),
    ]
}

/// One-line rendering of a verdict for streaming output.
pub fn verdict_line(verdict: &ScanVerdict, theme: &Theme) -> String {
    let constraint = if verdict.constraint.is_empty() {
        "-"
    } else {
        verdict.constraint.as_str()
    };
    format!(
        "{}  {}  {}  {}",
        theme.highlight.apply_to(&verdict.package),
        status_cell(verdict.status, theme),
        theme.dim.apply_to(constraint),
        result_cell(&verdict.result, theme)
    )
}

/// Full verdict table for a ledger.
pub fn ledger_table(ledger: &Ledger, theme: &Theme) -> Table {
    let mut table = Table::new(&HEADERS);
    for verdict in ledger.verdicts() {
        table.add_row(verdict_cells(verdict, theme));
    }
    table
}

/// `Summary for <subrepo>: Compatible: n / total (p%)`.
pub fn summary_line(subrepo: &str, summary: &Summary) -> String {
    format!("Summary for {}: {}", subrepo, summary)
}
