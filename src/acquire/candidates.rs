//! Ordered acquisition candidates.

use std::fmt;

use crate::registry::Package;

use super::git::to_ssh_url;

/// Branch-like labels tried, in order, after the latest published version.
pub const FALLBACK_LABELS: [&str; 2] = ["dev-master", "dev-main"];

/// Which archive to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveLabel {
    /// Newest published version, resolved from the registry when attempted.
    Latest,
    /// A fixed version or branch label.
    Fixed(String),
}

/// How a candidate is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionMethod {
    /// `git clone` of the declared VCS URL.
    Clone { url: String },
    /// Download and extract a dist archive.
    Archive { label: ArchiveLabel },
}

/// One attempt in the acquisition sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionCandidate {
    pub method: AcquisitionMethod,
}

impl AcquisitionCandidate {
    /// Clone candidate.
    pub fn git_clone(url: impl Into<String>) -> Self {
        Self {
            method: AcquisitionMethod::Clone { url: url.into() },
        }
    }

    /// Archive candidate for a fixed label.
    pub fn archive(label: impl Into<String>) -> Self {
        Self {
            method: AcquisitionMethod::Archive {
                label: ArchiveLabel::Fixed(label.into()),
            },
        }
    }

    /// Archive candidate for the latest published version.
    pub fn latest_archive() -> Self {
        Self {
            method: AcquisitionMethod::Archive {
                label: ArchiveLabel::Latest,
            },
        }
    }
}

impl fmt::Display for AcquisitionCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            AcquisitionMethod::Clone { url } => write!(f, "clone {}", url),
            AcquisitionMethod::Archive {
                label: ArchiveLabel::Latest,
            } => f.write_str("archive latest"),
            AcquisitionMethod::Archive {
                label: ArchiveLabel::Fixed(label),
            } => write!(f, "archive {}", label),
        }
    }
}

/// Candidates for `package`, in priority order.
///
/// A declared VCS URL is cloned first; the latest archive and the fallback
/// branch archives follow in case the clone fails.
pub fn plan(package: &Package) -> Vec<AcquisitionCandidate> {
    let mut candidates = Vec::with_capacity(4);

    if let Some(url) = package.source_url() {
        candidates.push(AcquisitionCandidate::git_clone(to_ssh_url(url)));
    }

    candidates.push(AcquisitionCandidate::latest_archive());
    candidates.extend(FALLBACK_LABELS.iter().map(|l| AcquisitionCandidate::archive(*l)));

    candidates
}
