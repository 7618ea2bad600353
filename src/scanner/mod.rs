//! Static compatibility scanning.
//!
//! A [`Scanner`] runs an analysis tool over an acquired source tree and
//! classifies the outcome as a [`FinalResult`]. Scanning never fails: tool
//! errors and timeouts become result text.

pub mod exit_code;
pub mod phpcs;

use std::path::Path;

use crate::ledger::FinalResult;

pub use exit_code::exit_code_text;
pub use phpcs::{PhpcsScanner, DEFAULT_PHPCS, DEFAULT_STANDARD};

/// Outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Classified result.
    pub result: FinalResult,
    /// Raw tool output, empty when the tool could not run.
    pub raw_output: String,
}

/// Checks a source tree against a target runtime version.
pub trait Scanner: Send + Sync {
    /// Scan `source` for `target` compatibility; `package` names error logs.
    fn scan(&self, source: &Path, target: &str, package: &str) -> ScanReport;
}
