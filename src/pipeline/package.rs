//! Resolution of a single package.

use crate::acquire::{AcquisitionMethod, SourceProvider};
use crate::constraint::{evaluate, ConstraintStatus};
use crate::ledger::{FinalResult, ScanVerdict};
use crate::registry::{ConstraintSource, Package};
use crate::scanner::Scanner;

/// A verdict plus a human-readable note on how it was reached.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub verdict: ScanVerdict,
    /// Acquisition/scan detail, shown in verbose mode.
    pub detail: Option<String>,
}

/// Borrowed collaborators needed to resolve one package.
pub struct Resolver<'a> {
    pub target: &'a str,
    pub constraints: &'a dyn ConstraintSource,
    pub sources: &'a dyn SourceProvider,
    pub scanner: &'a dyn Scanner,
}

impl Resolver<'_> {
    /// Evaluate the declared constraint and verify by scanning when needed.
    pub fn resolve(&self, package: &Package) -> Outcome {
        let declared = self.constraints.php_constraint(&package.name);
        let check = evaluate(self.target, declared.as_deref());
        let status = check.status();
        let constraint = check.display_constraint().to_string();

        let (result, detail) = match status {
            ConstraintStatus::Compatible => (FinalResult::Ok, None),
            ConstraintStatus::Incompatible => (FinalResult::Incompatible, None),
            ConstraintStatus::Risky | ConstraintStatus::Unknown => self.verify(package),
        };

        Outcome {
            verdict: ScanVerdict::new(&package.name, status, constraint, result),
            detail,
        }
    }

    fn verify(&self, package: &Package) -> (FinalResult, Option<String>) {
        let tree = match self.sources.provide(package) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("{}", e);
                return (FinalResult::AcquisitionFailed, Some(e.to_string()));
            }
        };

        let via = match &tree.candidate().method {
            AcquisitionMethod::Clone { url } => format!("cloned {}", url),
            AcquisitionMethod::Archive { .. } => format!("downloaded {}", tree.candidate()),
        };
        let report = self.scanner.scan(tree.path(), self.target, &package.name);
        let detail = format!("{}: {}, scan {}", package.name, via, report.result);

        (report.result, Some(detail))
    }
}
