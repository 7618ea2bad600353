//! Which packages a run covers.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{CompatError, Result};

/// Prefixes skipped on every run.
pub const ALWAYS_EXCLUDED: [&str; 1] = ["magento/"];

#[derive(Debug, Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    require: BTreeMap<String, serde_json::Value>,
}

/// Inclusion and exclusion rules for package names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// When set, only these names are processed.
    pub include_names: Option<BTreeSet<String>>,
    /// Lowercased name prefixes that are never processed.
    pub excluded_prefixes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_names: None,
            excluded_prefixes: ALWAYS_EXCLUDED.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl FilterConfig {
    /// Add extra excluded prefixes.
    pub fn with_excluded<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for prefix in prefixes {
            let prefix = prefix.as_ref().trim().to_lowercase();
            if !prefix.is_empty() && !self.excluded_prefixes.contains(&prefix) {
                self.excluded_prefixes.push(prefix);
            }
        }
        self
    }

    /// Restrict to an explicit set of names.
    pub fn with_included<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Build the inclusion set from a lockfile.
    ///
    /// With `only_direct`, the manifest next to the lockfile supplies the
    /// names (the keys of `require`). When that manifest is missing, or
    /// `only_direct` is off, the lockfile's `packages[].name` are used. A
    /// lockfile that does not exist leaves the run unrestricted.
    pub fn resolve(lockfile: Option<&Path>, only_direct: bool) -> Result<Self> {
        let Some(lockfile) = lockfile else {
            if only_direct {
                return Err(CompatError::Config {
                    message: "--only-direct requires --lockfile".to_string(),
                });
            }
            return Ok(Self::default());
        };

        if only_direct {
            let manifest = manifest_path(lockfile);
            if manifest.exists() {
                let names = read_direct_requirements(&manifest)?;
                tracing::info!(
                    "Restricting to {} direct requirements from {}",
                    names.len(),
                    manifest.display()
                );
                return Ok(Self::default().with_included(names));
            }
            tracing::warn!(
                "{} not found, falling back to {}",
                manifest.display(),
                lockfile.display()
            );
        }

        if lockfile.exists() {
            let names = read_locked_packages(lockfile)?;
            tracing::info!(
                "Restricting to {} packages from {}",
                names.len(),
                lockfile.display()
            );
            return Ok(Self::default().with_included(names));
        }

        tracing::info!(
            "{} not found, checking every package in the subrepository",
            lockfile.display()
        );
        Ok(Self::default())
    }

    /// Whether `name` should be processed.
    pub fn allows(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| lower.starts_with(prefix.as_str()))
        {
            return false;
        }
        match &self.include_names {
            Some(names) => names.contains(name),
            None => true,
        }
    }
}

/// `composer.lock` → `composer.json`.
pub fn manifest_path(lockfile: &Path) -> PathBuf {
    match lockfile.extension() {
        Some(ext) if ext == "lock" => lockfile.with_extension("json"),
        _ => lockfile
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("composer.json"),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CompatError::Config {
        message: format!("{} is not valid: {}", path.display(), e),
    })
}

fn read_locked_packages(lockfile: &Path) -> Result<BTreeSet<String>> {
    let lock: LockFile = read_json(lockfile)?;
    Ok(lock.packages.into_iter().map(|p| p.name).collect())
}

fn read_direct_requirements(manifest: &Path) -> Result<BTreeSet<String>> {
    let manifest: Manifest = read_json(manifest)?;
    Ok(manifest.require.into_keys().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(dir: &Path) -> PathBuf {
        let lock = dir.join("composer.lock");
        std::fs::write(
            &lock,
            r#"{"packages":[{"name":"acme/a","version":"1.0.0"},{"name":"acme/b"},{"name":"acme/c"}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("composer.json"),
            r#"{"require":{"php":">=8.1","acme/a":"^1.0"}}"#,
        )
        .unwrap();
        lock
    }

    #[test]
    fn magento_is_always_excluded() {
        let filter = FilterConfig::default();
        assert!(!filter.allows("magento/framework"));
        assert!(!filter.allows("Magento/Framework"));
        assert!(filter.allows("acme/magento-bridge"));
    }

    #[test]
    fn extra_prefixes_are_case_insensitive() {
        let filter = FilterConfig::default().with_excluded(["Symfony/"]);
        assert!(!filter.allows("symfony/console"));
        assert!(filter.allows("acme/console"));
    }

    #[test]
    fn inclusion_set_restricts() {
        let filter = FilterConfig::default().with_included(["acme/a", "acme/b"]);
        assert!(filter.allows("acme/a"));
        assert!(!filter.allows("acme/c"));
    }

    #[test]
    fn resolve_from_lockfile() {
        let temp = TempDir::new().unwrap();
        let lock = write_project(temp.path());

        let filter = FilterConfig::resolve(Some(&lock), false).unwrap();

        assert_eq!(filter.include_names.unwrap().len(), 3);
    }

    #[test]
    fn resolve_only_direct_uses_manifest() {
        let temp = TempDir::new().unwrap();
        let lock = write_project(temp.path());

        let filter = FilterConfig::resolve(Some(&lock), true).unwrap();

        assert!(filter.allows("acme/a"));
        assert!(!filter.allows("acme/b"));
    }

    #[test]
    fn only_direct_without_manifest_falls_back_to_lockfile() {
        let temp = TempDir::new().unwrap();
        let lock = write_project(temp.path());
        std::fs::remove_file(temp.path().join("composer.json")).unwrap();

        let filter = FilterConfig::resolve(Some(&lock), true).unwrap();

        assert!(filter.allows("acme/b"));
    }

    #[test]
    fn only_direct_without_lockfile_is_config_error() {
        let err = FilterConfig::resolve(None, true).unwrap_err();
        assert!(matches!(err, CompatError::Config { .. }));
    }

    #[test]
    fn missing_lockfile_is_unrestricted() {
        let temp = TempDir::new().unwrap();
        let filter =
            FilterConfig::resolve(Some(&temp.path().join("composer.lock")), false).unwrap();
        assert_eq!(filter, FilterConfig::default());
    }

    #[test]
    fn invalid_lockfile_is_config_error() {
        let temp = TempDir::new().unwrap();
        let lock = temp.path().join("composer.lock");
        std::fs::write(&lock, "{not json").unwrap();

        let err = FilterConfig::resolve(Some(&lock), false).unwrap_err();
        assert!(matches!(err, CompatError::Config { .. }));
    }

    #[test]
    fn manifest_path_swaps_extension() {
        assert_eq!(
            manifest_path(Path::new("app/composer.lock")),
            PathBuf::from("app/composer.json")
        );
        assert_eq!(
            manifest_path(Path::new("app/deps.txt")),
            PathBuf::from("app/composer.json")
        );
    }
}
