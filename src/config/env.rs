//! Credentials from `.env` files and the process environment.
//!
//! Values in the process environment win over the file, so a CI job can
//! override a checked-in `.env` without editing it.

use anyhow::{Context, Result as AnyResult};
use std::collections::HashMap;
use std::path::Path;

use crate::acquire::DistCredentials;
use crate::error::{CompatError, Result};
use crate::registry::ApiCredentials;

/// API token variable.
pub const PACKAGIST_PUBLIC: &str = "PACKAGIST_PUBLIC";
/// API secret variable.
pub const PACKAGIST_SECRET: &str = "PACKAGIST_SECRET";
/// Dist basic-auth user variable.
pub const COMPOSER_USER: &str = "COMPOSER_USER";
/// Dist basic-auth key variable.
pub const COMPOSER_KEY: &str = "COMPOSER_KEY";

/// Parses `KEY=value` lines.
///
/// # Supported Formats
///
/// - `KEY=value` and `KEY = value`
/// - `export KEY=value`
/// - `KEY="double"` and `KEY='single'` quoting
/// - `# comments` and blank lines
///
/// # Example
///
/// ```
/// use compat_check::config::EnvFile;
///
/// let vars = EnvFile::parse("# api\nPACKAGIST_PUBLIC=\"abc\"\nexport COMPOSER_USER=token\n");
/// assert_eq!(vars.get("PACKAGIST_PUBLIC").map(String::as_str), Some("abc"));
/// assert_eq!(vars.get("COMPOSER_USER").map(String::as_str), Some("token"));
/// ```
pub struct EnvFile;

impl EnvFile {
    /// Parse file content into a map. Malformed lines are skipped.
    pub fn parse(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), unquote(value.trim()).to_string()))
    }

    /// Read `path`; a missing file yields an empty map.
    pub fn load_optional(path: &Path) -> AnyResult<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::parse(&content))
    }
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Credentials for one run.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Registry API key pair. Required.
    pub api: ApiCredentials,
    /// Dist download auth. Archives are fetched anonymously without it.
    pub dist: Option<DistCredentials>,
}

impl Credentials {
    /// Resolve from `env_file` overlaid with the process environment.
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut vars = EnvFile::load_optional(env_file)?;
        for name in [PACKAGIST_PUBLIC, PACKAGIST_SECRET, COMPOSER_USER, COMPOSER_KEY] {
            if let Ok(value) = std::env::var(name) {
                vars.insert(name.to_string(), value);
            }
        }
        Self::from_vars(&vars)
    }

    /// Resolve from an already merged variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let api = ApiCredentials {
            key: required(vars, PACKAGIST_PUBLIC)?,
            secret: required(vars, PACKAGIST_SECRET)?,
        };

        let dist = match (optional(vars, COMPOSER_USER), optional(vars, COMPOSER_KEY)) {
            (Some(user), Some(key)) => Some(DistCredentials { user, key }),
            _ => {
                tracing::debug!("{}/{} not set", COMPOSER_USER, COMPOSER_KEY);
                None
            }
        };

        Ok(Self { api, dist })
    }
}

fn optional(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String> {
    optional(vars, name).ok_or_else(|| CompatError::MissingCredential {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_quotes_comments_and_export() {
        let content = r#"
# Private Packagist
PACKAGIST_PUBLIC="public token"
PACKAGIST_SECRET='s3cr=t'
export COMPOSER_USER = token
not a pair
=orphan
"#;

        let parsed = EnvFile::parse(content);

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["PACKAGIST_PUBLIC"], "public token");
        assert_eq!(parsed["PACKAGIST_SECRET"], "s3cr=t");
        assert_eq!(parsed["COMPOSER_USER"], "token");
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        let parsed = EnvFile::parse("A=\"half\nB='\n");
        assert_eq!(parsed["A"], "\"half");
        assert_eq!(parsed["B"], "'");
    }

    #[test]
    fn missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let parsed = EnvFile::load_optional(&temp.path().join(".env")).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn credentials_require_api_pair() {
        let err = Credentials::from_vars(&vars(&[(PACKAGIST_PUBLIC, "abc")])).unwrap_err();
        assert!(matches!(
            err,
            CompatError::MissingCredential { ref name } if name == PACKAGIST_SECRET
        ));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let err = Credentials::from_vars(&vars(&[
            (PACKAGIST_PUBLIC, "  "),
            (PACKAGIST_SECRET, "x"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(PACKAGIST_PUBLIC));
    }

    #[test]
    fn dist_credentials_need_both_halves() {
        let only_user = Credentials::from_vars(&vars(&[
            (PACKAGIST_PUBLIC, "a"),
            (PACKAGIST_SECRET, "b"),
            (COMPOSER_USER, "token"),
        ]))
        .unwrap();
        assert!(only_user.dist.is_none());

        let both = Credentials::from_vars(&vars(&[
            (PACKAGIST_PUBLIC, "a"),
            (PACKAGIST_SECRET, "b"),
            (COMPOSER_USER, "token"),
            (COMPOSER_KEY, "key"),
        ]))
        .unwrap();
        assert_eq!(both.dist.unwrap().user, "token");
    }

    #[test]
    fn loads_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        std::fs::write(
            &path,
            "PACKAGIST_PUBLIC=file-key\nPACKAGIST_SECRET=file-secret\n",
        )
        .unwrap();

        let creds = Credentials::load(&path).unwrap();

        // The process environment may override these in CI; only assert presence.
        assert!(!creds.api.key.is_empty());
        assert!(!creds.api.secret.is_empty());
    }
}
