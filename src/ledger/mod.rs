//! Resumable per-run result ledger.
//!
//! One JSON file per subrepository holds every verdict produced so far, as an
//! array of `[package, status, constraint, result]` tuples. The file is
//! rewritten after each verdict so an interrupted run loses at most the
//! package in flight.

pub mod store;
pub mod summary;
pub mod verdict;

pub use store::{Ledger, ResultStore};
pub use summary::{summarize, Summary};
pub use verdict::{FinalResult, ScanVerdict};
