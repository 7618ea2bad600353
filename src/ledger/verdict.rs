//! Per-package verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constraint::ConstraintStatus;

/// Final outcome recorded for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinalResult {
    /// Compatible, either by declaration or by a clean scan.
    Ok,
    /// The declared constraint excludes the target.
    Incompatible,
    /// No candidate source could be fetched.
    AcquisitionFailed,
    /// Scanner exit classification or invocation error message.
    Tool(String),
}

impl FinalResult {
    const OK: &'static str = "OK";
    const INCOMPATIBLE: &'static str = "Incompatible";
    const ACQUISITION_FAILED: &'static str = "Acquisition failed";

    /// Whether this result counts as compatible in the summary.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The text stored in the ledger.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => Self::OK,
            Self::Incompatible => Self::INCOMPATIBLE,
            Self::AcquisitionFailed => Self::ACQUISITION_FAILED,
            Self::Tool(text) => text,
        }
    }
}

impl From<String> for FinalResult {
    fn from(text: String) -> Self {
        match text.as_str() {
            Self::OK => Self::Ok,
            Self::INCOMPATIBLE => Self::Incompatible,
            Self::ACQUISITION_FAILED => Self::AcquisitionFailed,
            _ => Self::Tool(text),
        }
    }
}

impl From<FinalResult> for String {
    fn from(result: FinalResult) -> Self {
        match result {
            FinalResult::Tool(text) => text,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FinalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the ledger: `[package, status, constraint, result]` on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "(String, String, String, String)",
    into = "(String, String, String, String)"
)]
pub struct ScanVerdict {
    /// Package name (`vendor/name`).
    pub package: String,
    /// Classification from the declared constraint.
    pub status: ConstraintStatus,
    /// The declared constraint, empty when absent.
    pub constraint: String,
    /// Final outcome.
    pub result: FinalResult,
}

impl ScanVerdict {
    /// Create a verdict.
    pub fn new(
        package: impl Into<String>,
        status: ConstraintStatus,
        constraint: impl Into<String>,
        result: FinalResult,
    ) -> Self {
        Self {
            package: package.into(),
            status,
            constraint: constraint.into(),
            result,
        }
    }
}

impl TryFrom<(String, String, String, String)> for ScanVerdict {
    type Error = String;

    fn try_from(row: (String, String, String, String)) -> Result<Self, Self::Error> {
        let (package, status, constraint, result) = row;
        let status = ConstraintStatus::from_label(&status)
            .ok_or_else(|| format!("unknown status '{}' for {}", status, package))?;
        Ok(Self {
            package,
            status,
            constraint,
            result: FinalResult::from(result),
        })
    }
}

impl From<ScanVerdict> for (String, String, String, String) {
    fn from(v: ScanVerdict) -> Self {
        (
            v.package,
            v.status.label().to_string(),
            v.constraint,
            v.result.into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_result_text_mapping() {
        assert_eq!(FinalResult::from("OK".to_string()), FinalResult::Ok);
        assert_eq!(
            FinalResult::from("Acquisition failed".to_string()),
            FinalResult::AcquisitionFailed
        );
        assert_eq!(
            FinalResult::from("General error".to_string()),
            FinalResult::Tool("General error".into())
        );
        assert_eq!(String::from(FinalResult::Incompatible), "Incompatible");
    }

    #[test]
    fn only_ok_counts_as_compatible() {
        assert!(FinalResult::Ok.is_ok());
        assert!(!FinalResult::Incompatible.is_ok());
        assert!(!FinalResult::Tool("OK ".into()).is_ok());
    }

    #[test]
    fn verdict_serializes_as_tuple() {
        let verdict = ScanVerdict::new(
            "acme/billing",
            ConstraintStatus::Risky,
            "^8.0",
            FinalResult::Tool("General error".into()),
        );

        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(json, r#"["acme/billing","Risky","^8.0","General error"]"#);
    }

    #[test]
    fn verdict_reads_escaped_slashes() {
        let verdict: ScanVerdict =
            serde_json::from_str(r#"["acme\/billing","Unknown","","OK"]"#).unwrap();

        assert_eq!(verdict.package, "acme/billing");
        assert_eq!(verdict.status, ConstraintStatus::Unknown);
        assert_eq!(verdict.result, FinalResult::Ok);
    }

    #[test]
    fn verdict_rejects_unknown_status() {
        let result: Result<ScanVerdict, _> =
            serde_json::from_str(r#"["acme/billing","<info>Compatible</info>","","OK"]"#);
        assert!(result.is_err());
    }
}
