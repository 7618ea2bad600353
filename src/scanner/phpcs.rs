//! PHP_CodeSniffer with the PHPCompatibility standard.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::ledger::FinalResult;
use crate::shell::{ToolInvocation, ToolRunner};

use super::exit_code::exit_code_text;
use super::{ScanReport, Scanner};

/// Default `phpcs` binary, relative to the working directory.
pub const DEFAULT_PHPCS: &str = "vendor/bin/phpcs";

/// Default location of the PHPCompatibility standard.
pub const DEFAULT_STANDARD: &str = "vendor/phpcompatibility/php-compatibility/PHPCompatibility";

/// Exit text whose raw output is kept for inspection.
const GENERAL_ERROR: &str = "General error";

/// Runs `phpcs` over a source tree.
pub struct PhpcsScanner {
    runner: Arc<dyn ToolRunner>,
    phpcs: String,
    standard: String,
    errors_dir: PathBuf,
    timeout: Duration,
    prepared: OnceLock<()>,
}

impl PhpcsScanner {
    /// Default time budget for one scan.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

    /// Create a scanner that writes general-error logs under `errors_dir`.
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        phpcs: impl Into<String>,
        standard: impl Into<String>,
        errors_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            phpcs: phpcs.into(),
            standard: standard.into(),
            errors_dir: errors_dir.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            prepared: OnceLock::new(),
        }
    }

    /// Path of the raw-output log for `package`.
    pub fn error_log_path(&self, package: &str) -> PathBuf {
        self.errors_dir
            .join(format!("{}-log.txt", package.replace('/', "-")))
    }

    /// Make warnings non-fatal to the exit code. Runs once per scanner.
    fn prepare(&self) {
        self.prepared.get_or_init(|| {
            let invocation = ToolInvocation::new(&self.phpcs, Duration::from_secs(60)).args([
                "--config-set",
                "ignore_warnings_on_exit",
                "1",
            ]);
            match self.runner.run(&invocation) {
                Ok(output) if output.success => {}
                Ok(output) => tracing::warn!(
                    "{} exited with {:?}",
                    invocation.display(),
                    output.exit_code
                ),
                Err(e) => tracing::warn!("{}", e),
            }
        });
    }

    fn keep_error_log(&self, package: &str, output: &str) {
        let path = self.error_log_path(package);
        let written = std::fs::create_dir_all(&self.errors_dir)
            .and_then(|_| std::fs::write(&path, output));
        match written {
            Ok(()) => tracing::debug!("Wrote {}", path.display()),
            Err(e) => tracing::warn!("Failed to write {}: {}", path.display(), e),
        }
    }
}

impl Scanner for PhpcsScanner {
    fn scan(&self, source: &Path, target: &str, package: &str) -> ScanReport {
        self.prepare();

        let invocation = ToolInvocation::new(&self.phpcs, self.timeout)
            .arg("-p")
            .arg(source.to_string_lossy())
            .arg(format!("--standard={}", self.standard))
            .arg("--extensions=php,phtml")
            .args(["--runtime-set", "testVersion", target]);

        tracing::debug!("Scanning {}: {}", package, invocation.display());

        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(e) => {
                return ScanReport {
                    result: FinalResult::Tool(e.to_string()),
                    raw_output: String::new(),
                }
            }
        };

        let text = match output.exit_code {
            Some(code) => exit_code_text(code),
            None => "Unknown error",
        };

        if text == GENERAL_ERROR {
            self.keep_error_log(package, &output.stdout);
        }

        ScanReport {
            result: FinalResult::from(text.to_string()),
            raw_output: output.stdout,
        }
    }
}
