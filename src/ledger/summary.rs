//! Running compatibility summary.

use std::fmt;

use super::store::Ledger;

/// Compatible-count summary of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Verdicts whose final result is OK.
    pub compatible: usize,
    /// All verdicts.
    pub total: usize,
    /// `compatible / total` as a whole percentage, 0 for an empty ledger.
    pub percentage: u32,
}

impl Summary {
    /// Summary of `compatible` out of `total` verdicts.
    pub fn new(compatible: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (compatible as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            compatible,
            total,
            percentage,
        }
    }
}

/// Summarize a ledger.
pub fn summarize(ledger: &Ledger) -> Summary {
    let compatible = ledger
        .verdicts()
        .iter()
        .filter(|v| v.result.is_ok())
        .count();

    Summary::new(compatible, ledger.len())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Compatible: {} / {} ({}%)",
            self.compatible, self.total, self.percentage
        )
    }
}
