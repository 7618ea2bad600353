//! Package source acquisition.
//!
//! A package's source is obtained by trying an ordered list of
//! [`AcquisitionCandidate`]s until one yields a usable tree:
//!
//! - [`git`]: shallow clone of the declared VCS URL over SSH
//! - [`archive`]: dist archive download plus `unzip`
//! - [`candidates`]: the order in which those are tried
//!
//! Every attempt lands in the same deterministic work path derived from the
//! package name, so concurrent workers never share a directory.

pub mod archive;
pub mod candidates;
pub mod git;

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::registry::{Package, PackageRegistry, DEFAULT_BRANCH_LABEL};
use crate::shell::ToolRunner;

pub use archive::{ArchiveFetcher, DistCredentials, DistLocation, DEFAULT_REPO_URL};
pub use candidates::{plan, AcquisitionCandidate, AcquisitionMethod, ArchiveLabel};

/// Acquisition failed for every candidate.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// No candidate produced a source tree.
    #[error("No source could be acquired for {package} ({} attempts)", attempts.len())]
    Exhausted {
        package: String,
        /// One line per failed attempt, in order.
        attempts: Vec<String>,
    },
}

/// An extracted source tree, removed from disk when dropped.
#[derive(Debug)]
pub struct SourceTree {
    path: PathBuf,
    candidate: AcquisitionCandidate,
}

impl SourceTree {
    /// Take ownership of the directory at `path`.
    pub fn new(path: impl Into<PathBuf>, candidate: AcquisitionCandidate) -> Self {
        Self {
            path: path.into(),
            candidate,
        }
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The candidate that produced it.
    pub fn candidate(&self) -> &AcquisitionCandidate {
        &self.candidate
    }
}

impl Drop for SourceTree {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

/// Something that can produce a package's source tree.
pub trait SourceProvider: Send + Sync {
    /// Acquire the source of `package`, trying its candidates in order.
    fn provide(&self, package: &Package) -> Result<SourceTree, AcquireError>;
}

/// Clones or downloads package sources into a work directory.
pub struct SourceAcquirer {
    runner: Arc<dyn ToolRunner>,
    registry: Arc<dyn PackageRegistry>,
    archives: ArchiveFetcher,
    work_dir: PathBuf,
    tool_timeout: Duration,
}

impl SourceAcquirer {
    /// Default time budget for `git clone` and `unzip`.
    pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(600);

    /// Create an acquirer writing into `work_dir`.
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        registry: Arc<dyn PackageRegistry>,
        archives: ArchiveFetcher,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            registry,
            archives,
            work_dir: work_dir.into(),
            tool_timeout: Self::DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Deterministic checkout path for `package`.
    pub fn work_path(&self, package: &str) -> PathBuf {
        work_path(&self.work_dir, package)
    }

    /// Try `candidates` in order until one yields a source tree.
    ///
    /// Archive labels already attempted are skipped, so when the latest
    /// version resolves to `dev-master` that branch is downloaded once.
    pub fn acquire(
        &self,
        package: &Package,
        candidates: &[AcquisitionCandidate],
    ) -> Result<SourceTree, AcquireError> {
        let dest = self.work_path(&package.name);
        let mut tried_labels: Vec<String> = Vec::new();
        let mut attempts = Vec::new();

        for candidate in candidates {
            let resolved = match &candidate.method {
                AcquisitionMethod::Clone { .. } => candidate.clone(),
                AcquisitionMethod::Archive { label } => {
                    let label = match label {
                        ArchiveLabel::Fixed(label) => label.clone(),
                        ArchiveLabel::Latest => self.latest_label(&package.name),
                    };
                    if tried_labels.contains(&label) {
                        tracing::debug!("{}: {} already tried", package.name, label);
                        continue;
                    }
                    tried_labels.push(label.clone());
                    AcquisitionCandidate::archive(label)
                }
            };

            clear_stale(&dest);
            tracing::debug!("{}: trying {}", package.name, resolved);

            match self.attempt(package, &resolved, &dest) {
                Ok(()) => {
                    tracing::debug!("{}: acquired via {}", package.name, resolved);
                    return Ok(SourceTree::new(dest, resolved));
                }
                Err(e) => {
                    tracing::debug!("{}: {} failed: {}", package.name, resolved, e);
                    attempts.push(format!("{}: {}", resolved, e));
                }
            }
        }

        clear_stale(&dest);
        Err(AcquireError::Exhausted {
            package: package.name.clone(),
            attempts,
        })
    }

    fn attempt(
        &self,
        package: &Package,
        candidate: &AcquisitionCandidate,
        dest: &Path,
    ) -> crate::error::Result<()> {
        match &candidate.method {
            AcquisitionMethod::Clone { url } => {
                git::clone_into(self.runner.as_ref(), url, dest, self.tool_timeout)
            }
            AcquisitionMethod::Archive { label } => {
                let label = match label {
                    ArchiveLabel::Fixed(label) => label.as_str(),
                    ArchiveLabel::Latest => DEFAULT_BRANCH_LABEL,
                };
                self.archives.fetch_into(
                    self.runner.as_ref(),
                    &package.name,
                    label,
                    &self.work_dir,
                    dest,
                    self.tool_timeout,
                )
            }
        }
    }

    /// Newest published version label, or the default branch on lookup failure.
    fn latest_label(&self, name: &str) -> String {
        let subrepo = &self.archives.location().subrepo;
        match self.registry.package_detail(subrepo, name) {
            Ok(detail) => detail.latest_label(),
            Err(e) => {
                tracing::warn!("Could not list versions of {}: {}", name, e);
                DEFAULT_BRANCH_LABEL.to_string()
            }
        }
    }
}

impl SourceProvider for SourceAcquirer {
    fn provide(&self, package: &Package) -> Result<SourceTree, AcquireError> {
        self.acquire(package, &plan(package))
    }
}

/// `<work_dir>/<first 16 hex chars of sha256(name)>`.
pub fn work_path(work_dir: &Path, package: &str) -> PathBuf {
    let hash = Sha256::digest(package.as_bytes());
    work_dir.join(hex::encode(&hash[..8]))
}

fn clear_stale(dest: &Path) {
    if dest.exists() {
        if let Err(e) = std::fs::remove_dir_all(dest) {
            tracing::warn!("Failed to remove stale {}: {}", dest.display(), e);
        }
    }
}
