//! Installed and latest version lookups.

pub mod extract;
pub mod fetch;
pub mod resolver;

pub use extract::{compile, extract, extract_str};
pub use fetch::HttpFetcher;
pub use resolver::{VersionReport, VersionResolver};
