//! Result ledger storage.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CompatError, Result};

use super::verdict::ScanVerdict;

/// Ordered verdicts for one run, unique by package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    verdicts: Vec<ScanVerdict>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from verdicts, keeping the first verdict per package.
    pub fn from_verdicts(verdicts: Vec<ScanVerdict>) -> Self {
        let mut ledger = Self::new();
        for verdict in verdicts {
            if !ledger.contains(&verdict.package) {
                ledger.verdicts.push(verdict);
            }
        }
        ledger
    }

    /// Look up a package's verdict.
    pub fn get(&self, package: &str) -> Option<&ScanVerdict> {
        self.verdicts.iter().find(|v| v.package == package)
    }

    /// Whether a package already has a verdict.
    pub fn contains(&self, package: &str) -> bool {
        self.get(package).is_some()
    }

    /// Record a verdict. An existing verdict for the same package is replaced
    /// in place.
    fn insert(&mut self, verdict: ScanVerdict) {
        match self
            .verdicts
            .iter_mut()
            .find(|v| v.package == verdict.package)
        {
            Some(existing) => {
                tracing::debug!("Replacing verdict for {}", verdict.package);
                *existing = verdict;
            }
            None => self.verdicts.push(verdict),
        }
    }

    /// Verdicts in processing order.
    pub fn verdicts(&self) -> &[ScanVerdict] {
        &self.verdicts
    }

    /// Number of verdicts.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// Persistent ledger for one run key (subrepository).
///
/// Every append rewrites the whole file through a temp file and rename, so a
/// crash leaves either the previous or the new ledger on disk, never a torn one.
#[derive(Debug)]
pub struct ResultStore {
    path: PathBuf,
    ledger: Ledger,
}

impl ResultStore {
    /// Path of the ledger file for `run_key` inside `results_dir`.
    pub fn ledger_path(results_dir: &Path, run_key: &str) -> PathBuf {
        let safe_key = run_key.replace(['/', '\\'], "-");
        results_dir.join(format!("results_{}.json", safe_key))
    }

    /// Load the persisted ledger for `run_key`, if present.
    pub fn try_load(results_dir: &Path, run_key: &str) -> Result<Option<Ledger>> {
        let path = Self::ledger_path(results_dir, run_key);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let verdicts: Vec<ScanVerdict> =
            serde_json::from_str(&json).map_err(|e| CompatError::Persistence {
                path: path.clone(),
                message: format!("unreadable ledger ({}); rerun with --force to rebuild", e),
            })?;

        Ok(Some(Ledger::from_verdicts(verdicts)))
    }

    /// Open the store, resuming from the persisted ledger unless `force`.
    pub fn open(results_dir: &Path, run_key: &str, force: bool) -> Result<Self> {
        let path = Self::ledger_path(results_dir, run_key);
        let ledger = if force {
            Ledger::new()
        } else {
            Self::try_load(results_dir, run_key)?.unwrap_or_default()
        };

        Ok(Self { path, ledger })
    }

    /// Remove the persisted ledger for `run_key`. Returns whether a file was removed.
    pub fn clear(results_dir: &Path, run_key: &str) -> Result<bool> {
        let path = Self::ledger_path(results_dir, run_key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Add a verdict and persist the full ledger immediately.
    pub fn append(&mut self, verdict: ScanVerdict) -> Result<()> {
        self.ledger.insert(verdict);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let to_persistence = |e: std::io::Error| CompatError::Persistence {
            path: self.path.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(to_persistence)?;
            }
        }

        let json = serde_json::to_string(self.ledger.verdicts())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(to_persistence)?;
        fs::rename(&tmp, &self.path).map_err(to_persistence)?;

        tracing::debug!(
            "Persisted {} verdicts to {}",
            self.ledger.len(),
            self.path.display()
        );
        Ok(())
    }
}
