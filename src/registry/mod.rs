//! Package registry access.
//!
//! - [`packagist`]: Private Packagist API client
//! - [`composer`]: declared `php` constraints via the composer CLI
//!
//! Both sit behind traits so the pipeline can run against in-memory fakes.

pub mod composer;
pub mod packagist;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use composer::ComposerMetadata;
pub use packagist::{ApiCredentials, PackagistClient, DEFAULT_API_URL};

/// Label tried when a package has no published versions.
pub const DEFAULT_BRANCH_LABEL: &str = "dev-master";

/// A package listed in a subrepository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// `vendor/name`.
    pub name: String,
    /// Registry-side configuration of the package.
    #[serde(default)]
    pub config: PackageConfig,
}

/// Registry-side package configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// VCS URL the package is mirrored from, if any.
    #[serde(default)]
    pub url: Option<String>,
}

impl Package {
    /// A package without a VCS URL.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: PackageConfig::default(),
        }
    }

    /// Attach a VCS URL.
    #[cfg(test)]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = Some(url.into());
        self
    }

    /// The declared VCS URL, ignoring blanks.
    pub fn source_url(&self) -> Option<&str> {
        self.config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Detail response for a single package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDetail {
    /// Published versions, newest first.
    #[serde(default)]
    pub versions: Vec<PackageVersion>,
}

/// One published version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVersion {
    /// Version as tagged.
    #[serde(default)]
    pub version: String,
    /// Composer-normalized version (`1.2.3.0`, `dev-master`).
    #[serde(rename = "versionNormalized", default)]
    pub version_normalized: Option<String>,
}

impl PackageDetail {
    /// Label of the newest published version, used as the first archive candidate.
    pub fn latest_label(&self) -> String {
        self.versions
            .first()
            .and_then(|v| {
                v.version_normalized
                    .clone()
                    .filter(|n| !n.is_empty())
                    .or_else(|| Some(v.version.clone()).filter(|n| !n.is_empty()))
            })
            .unwrap_or_else(|| DEFAULT_BRANCH_LABEL.to_string())
    }
}

/// Lists packages and their versions.
pub trait PackageRegistry: Send + Sync {
    /// All packages in a subrepository.
    fn list_packages(&self, subrepo: &str) -> Result<Vec<Package>>;

    /// Version detail of one package.
    fn package_detail(&self, subrepo: &str, name: &str) -> Result<PackageDetail>;
}

/// Supplies a package's declared `php` constraint.
pub trait ConstraintSource: Send + Sync {
    /// The constraint, or `None` when absent or unobtainable.
    fn php_constraint(&self, package: &str) -> Option<String>;
}
