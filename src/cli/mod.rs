//! Command-line interface for verwatch.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, RemoveArgs};
pub use commands::{dispatch, settings_for};
