//! Declared constraints via `composer show`.

use std::sync::Arc;
use std::time::Duration;

use crate::shell::{ToolInvocation, ToolRunner};

use super::ConstraintSource;

/// Reads `requires.php` from `composer show -a <package> --format json`.
pub struct ComposerMetadata {
    runner: Arc<dyn ToolRunner>,
    composer: String,
    timeout: Duration,
}

impl ComposerMetadata {
    /// Default time budget for one metadata lookup.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create a source that runs the `composer` binary at `composer`.
    pub fn new(runner: Arc<dyn ToolRunner>, composer: impl Into<String>) -> Self {
        Self {
            runner,
            composer: composer.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

impl ConstraintSource for ComposerMetadata {
    fn php_constraint(&self, package: &str) -> Option<String> {
        let invocation = ToolInvocation::new(&self.composer, self.timeout).args([
            "show",
            "-a",
            package,
            "--format",
            "json",
        ]);

        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Could not read metadata for {}: {}", package, e);
                return None;
            }
        };

        if !output.success {
            tracing::debug!(
                "composer show {} exited with {:?}",
                package,
                output.exit_code
            );
            return None;
        }

        parse_php_requirement(&output.stdout)
    }
}

/// Extract `requires.php` from composer's JSON output.
fn parse_php_requirement(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    value
        .get("requires")?
        .get("php")?
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
