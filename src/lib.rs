//! verwatch - track the installed and latest versions of your software.
//!
//! Each tracked program is an [`store::Entry`]: how to find and run the
//! installed executable, a pattern that pulls the version out of its output,
//! and a web page plus pattern for the latest release.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Runtime settings from the environment
//! - [`error`] - Error types and result aliases
//! - [`migrations`] - Upgrades of stored records between schema versions
//! - [`shell`] - Executable resolution and command execution
//! - [`store`] - The persisted software list
//! - [`version`] - Version extraction, page fetching and resolution
//!
//! # Example
//!
//! ```
//! use verwatch::version::extract_str;
//!
//! let version = extract_str("git version 2.43.0", r"version (\S+)").unwrap();
//! assert_eq!(version, "2.43.0");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod migrations;
pub mod shell;
pub mod store;
pub mod version;

pub use error::{Result, VerwatchError};
