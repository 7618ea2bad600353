//! compat-check - PHP version compatibility audits for Private Packagist.
//!
//! For every package in a subrepository, compat-check reads the declared
//! `php` constraint, decides whether a target PHP version satisfies it, and
//! when the constraint alone is not conclusive fetches the source and runs
//! PHP_CodeSniffer with the PHPCompatibility standard. Verdicts are stored
//! per subrepository so an interrupted audit picks up where it stopped.
//!
//! # Modules
//!
//! - [`acquire`] - Source checkout by clone or dist archive
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Run configuration, package filters and credentials
//! - [`constraint`] - Composer constraint parsing and evaluation
//! - [`error`] - Error types and result aliases
//! - [`ledger`] - Resumable result storage and summaries
//! - [`pipeline`] - The per-package resolution run
//! - [`registry`] - Private Packagist API and composer metadata
//! - [`scanner`] - phpcs invocation and exit classification
//! - [`shell`] - External tool execution with timeouts
//! - [`ui`] - Terminal output, tables and progress
//!
//! # Example
//!
//! ```
//! use compat_check::constraint::{evaluate, ConstraintStatus};
//!
//! assert_eq!(evaluate("8.1", Some(">=8.1")).status(), ConstraintStatus::Compatible);
//! assert_eq!(evaluate("8.1", Some(">=7.4")).status(), ConstraintStatus::Risky);
//! assert_eq!(evaluate("8.1", Some("^7.2")).status(), ConstraintStatus::Incompatible);
//! assert_eq!(evaluate("8.1", None).status(), ConstraintStatus::Unknown);
//! ```

pub mod acquire;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod ledger;
pub mod pipeline;
pub mod registry;
pub mod scanner;
pub mod shell;
pub mod ui;

pub use error::{CompatError, Result};
