//! Declared PHP constraint evaluation.
//!
//! - [`range`]: Composer constraint grammar and matching
//! - [`evaluator`]: satisfaction and "risky" classification for a target

pub mod evaluator;
pub mod range;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use evaluator::{evaluate, ConstraintCheck};
pub use range::{parse_version, Constraint};

/// Classification of a package from its declared constraint alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintStatus {
    /// The constraint names the target version.
    Compatible,
    /// The target is only implied by a range.
    Risky,
    /// The constraint excludes the target.
    Incompatible,
    /// No usable constraint.
    Unknown,
}

impl ConstraintStatus {
    /// Whether a source scan is required.
    pub fn needs_verification(&self) -> bool {
        matches!(self, Self::Risky | Self::Unknown)
    }

    /// Stable label used in the persisted ledger.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compatible => "Compatible",
            Self::Risky => "Risky",
            Self::Incompatible => "Incompatible",
            Self::Unknown => "Unknown",
        }
    }

    /// Inverse of [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Compatible" => Some(Self::Compatible),
            "Risky" => Some(Self::Risky),
            "Incompatible" => Some(Self::Incompatible),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_risky_and_unknown_need_verification() {
        assert!(!ConstraintStatus::Compatible.needs_verification());
        assert!(ConstraintStatus::Risky.needs_verification());
        assert!(!ConstraintStatus::Incompatible.needs_verification());
        assert!(ConstraintStatus::Unknown.needs_verification());
    }

    #[test]
    fn labels_round_trip() {
        for status in [
            ConstraintStatus::Compatible,
            ConstraintStatus::Risky,
            ConstraintStatus::Incompatible,
            ConstraintStatus::Unknown,
        ] {
            assert_eq!(ConstraintStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(ConstraintStatus::from_label("<info>Compatible</info>"), None);
    }
}
