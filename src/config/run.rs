//! Validated settings for one `check` run.

use std::path::PathBuf;

use crate::constraint::parse_version;
use crate::error::{CompatError, Result};

/// Immutable configuration handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Organization id, used in dist URLs.
    pub organization: String,
    /// Subrepository id; also the ledger key.
    pub subrepo: String,
    /// Target PHP version, e.g. `8.1`.
    pub php_version: String,
    /// `composer.lock` restricting the package set.
    pub lockfile: Option<PathBuf>,
    /// Restrict to the manifest's direct requirements.
    pub only_direct: bool,
    /// Ignore any stored ledger.
    pub force: bool,
    /// Concurrent package workers.
    pub jobs: usize,
    /// Extra excluded name prefixes.
    pub excludes: Vec<String>,
    /// Ledger directory.
    pub results_dir: PathBuf,
    /// General-error log directory.
    pub errors_dir: PathBuf,
    /// Checkout directory.
    pub work_dir: PathBuf,
    /// `phpcs` binary.
    pub phpcs: String,
    /// PHPCompatibility standard path.
    pub standard: String,
    /// `composer` binary.
    pub composer: String,
    /// Registry API root.
    pub api_url: String,
    /// Dist host root.
    pub repo_url: String,
}

impl RunConfig {
    /// Reject invalid flag combinations before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.only_direct && self.lockfile.is_none() {
            return Err(config_error(
                "--only-direct requires --lockfile pointing at composer.lock",
            ));
        }
        if self.subrepo.trim().is_empty() {
            return Err(config_error("subrepository name must not be empty"));
        }
        if self.subrepo.contains(['/', '\\']) {
            return Err(config_error("subrepository name must not contain path separators"));
        }
        if parse_version(&self.php_version).is_none() {
            return Err(config_error(&format!(
                "'{}' is not a PHP version",
                self.php_version
            )));
        }
        if self.jobs == 0 {
            return Err(config_error("--jobs must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(message: &str) -> CompatError {
    CompatError::Config {
        message: message.to_string(),
    }
}
