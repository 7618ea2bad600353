//! Target-version evaluation against a declared constraint.

use super::range::{parse_version, Constraint};
use super::ConstraintStatus;

/// Outcome of checking a target PHP version against a package's declared
/// `php` requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintCheck {
    /// The constraint as declared, if any.
    pub declared: Option<String>,
    /// The target satisfies the constraint.
    pub satisfied: bool,
    /// Satisfied only by range inclusion, not by naming the target literally.
    pub risky: bool,
    /// Both the constraint and the target parsed.
    pub parsed: bool,
}

impl ConstraintCheck {
    /// Classify this check.
    pub fn status(&self) -> ConstraintStatus {
        match (self.parsed, self.satisfied, self.risky) {
            (false, _, _) => ConstraintStatus::Unknown,
            (true, true, false) => ConstraintStatus::Compatible,
            (true, true, true) => ConstraintStatus::Risky,
            (true, false, _) => ConstraintStatus::Incompatible,
        }
    }

    /// Whether the source has to be fetched and scanned to reach a verdict.
    pub fn needs_verification(&self) -> bool {
        self.status().needs_verification()
    }

    /// The declared constraint, or an empty string.
    pub fn display_constraint(&self) -> &str {
        self.declared.as_deref().unwrap_or("")
    }
}

/// Evaluate `target` against `declared`.
///
/// An absent or malformed constraint is never satisfied, which forces the
/// package onto the verification path.
pub fn evaluate(target: &str, declared: Option<&str>) -> ConstraintCheck {
    let Some(raw) = declared.map(str::trim).filter(|c| !c.is_empty()) else {
        return ConstraintCheck {
            declared: None,
            satisfied: false,
            risky: true,
            parsed: false,
        };
    };

    let parsed = Constraint::parse(raw).zip(parse_version(target));
    let Some((constraint, version)) = parsed else {
        tracing::debug!("Unparseable constraint '{}' for target {}", raw, target);
        return ConstraintCheck {
            declared: Some(raw.to_string()),
            satisfied: false,
            risky: true,
            parsed: false,
        };
    };

    let satisfied = constraint.satisfies(&version);
    let pinned = raw
        .to_lowercase()
        .contains(&target.trim().to_lowercase());

    ConstraintCheck {
        declared: Some(raw.to_string()),
        satisfied,
        risky: satisfied && !pinned,
        parsed: true,
    }
}
