//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`].

pub mod check;
pub mod clear;
pub mod dispatcher;
pub mod show;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
