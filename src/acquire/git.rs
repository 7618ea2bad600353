//! Source acquisition by git clone.

use std::path::Path;
use std::time::Duration;

use crate::error::{CompatError, Result};
use crate::shell::{ToolInvocation, ToolRunner};

/// Rewrite an HTTPS repository URL into its SSH form.
///
/// `https://github.com/acme/billing` becomes `git@github.com:acme/billing`.
/// Other URLs are returned unchanged.
pub fn to_ssh_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("https://") else {
        return url.to_string();
    };

    let (authority, path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, Some(path)),
        None => (rest, None),
    };

    // Drop embedded credentials; SSH auth uses keys.
    let host = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);

    match path {
        Some(path) => format!("git@{}:{}", host, path),
        None => format!("git@{}", host),
    }
}

/// Shallow-clone `url` into `dest`.
pub fn clone_into(
    runner: &dyn ToolRunner,
    url: &str,
    dest: &Path,
    timeout: Duration,
) -> Result<()> {
    let invocation = ToolInvocation::new("git", timeout).args([
        "clone".to_string(),
        "--depth".to_string(),
        "1".to_string(),
        url.to_string(),
        dest.to_string_lossy().to_string(),
    ]);

    let output = runner.run(&invocation)?;
    if !output.success {
        tracing::debug!("git clone failed: {}", output.stderr.trim());
        return Err(CompatError::CommandFailed {
            command: invocation.display(),
            code: output.exit_code,
        });
    }

    Ok(())
}
