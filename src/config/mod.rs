//! Run configuration.
//!
//! - [`run`]: validated flags for one `check` run
//! - [`filter`]: package inclusion/exclusion from lockfile and prefixes
//! - [`env`]: credentials from `.env` and the environment

pub mod env;
pub mod filter;
pub mod run;

pub use env::{Credentials, EnvFile};
pub use filter::{FilterConfig, ALWAYS_EXCLUDED};
pub use run::RunConfig;
