//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::acquire::DEFAULT_REPO_URL;
use crate::config::RunConfig;
use crate::registry::DEFAULT_API_URL;
use crate::scanner::{DEFAULT_PHPCS, DEFAULT_STANDARD};

/// Audit a Private Packagist subrepository for PHP version compatibility.
#[derive(Debug, Parser)]
#[command(name = "compat-check")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show per-package acquisition detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final summary and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check every package of a subrepository against a PHP version
    Check(CheckArgs),

    /// Show the stored results of a previous check
    Show(LedgerArgs),

    /// Delete the stored results of a subrepository
    Clear(LedgerArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Private Packagist organization
    pub organization: String,

    /// Subrepository to audit
    pub subrepo: String,

    /// Target PHP version
    #[arg(long, visible_alias = "phpversion", default_value = "8.1")]
    pub php_version: String,

    /// composer.lock restricting which packages are checked
    #[arg(long)]
    pub lockfile: Option<PathBuf>,

    /// Only check packages required directly by composer.json (needs --lockfile)
    #[arg(long)]
    pub only_direct: bool,

    /// Ignore stored results and check everything again
    #[arg(short, long)]
    pub force: bool,

    /// Packages resolved in parallel
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Skip packages whose name starts with this prefix (repeatable)
    #[arg(long = "exclude", value_name = "PREFIX")]
    pub excludes: Vec<String>,

    /// Directory for results_<subrepo>.json
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Directory for raw scanner output of failed scans
    #[arg(long, default_value = "errors")]
    pub errors_dir: PathBuf,

    /// Directory sources are checked out into [default: <tmp>/compat-check]
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// phpcs binary
    #[arg(long, default_value = DEFAULT_PHPCS)]
    pub phpcs: String,

    /// PHPCompatibility standard path
    #[arg(long, default_value = DEFAULT_STANDARD)]
    pub standard: String,

    /// composer binary
    #[arg(long, default_value = "composer")]
    pub composer: String,

    /// File holding PACKAGIST_PUBLIC, PACKAGIST_SECRET, COMPOSER_USER and COMPOSER_KEY
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Registry API root
    #[arg(long, env = "PACKAGIST_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,

    /// Dist archive host
    #[arg(long, env = "PACKAGIST_REPO_URL", default_value = DEFAULT_REPO_URL, hide = true)]
    pub repo_url: String,
}

impl CheckArgs {
    /// Convert to the pipeline's configuration.
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            organization: self.organization.clone(),
            subrepo: self.subrepo.clone(),
            php_version: self.php_version.clone(),
            lockfile: self.lockfile.clone(),
            only_direct: self.only_direct,
            force: self.force,
            jobs: self.jobs,
            excludes: self.excludes.clone(),
            results_dir: self.results_dir.clone(),
            errors_dir: self.errors_dir.clone(),
            work_dir: self
                .work_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("compat-check")),
            phpcs: self.phpcs.clone(),
            standard: self.standard.clone(),
            composer: self.composer.clone(),
            api_url: self.api_url.clone(),
            repo_url: self.repo_url.clone(),
        }
    }
}

/// Arguments for `show` and `clear`.
#[derive(Debug, Clone, clap::Args)]
pub struct LedgerArgs {
    /// Subrepository whose results to use
    pub subrepo: String,

    /// Directory holding results_<subrepo>.json
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,
}
