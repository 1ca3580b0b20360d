//! Error types for verwatch operations.
//!
//! This module defines [`VerwatchError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every failure the core can produce has its own variant carrying the
//!   offending name, path, pattern or URL, so callers can render a precise
//!   message without parsing strings
//! - Use `anyhow::Error` (via `VerwatchError::Other`) for unexpected errors
//! - Nothing in the core uses these errors for ordinary control flow

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Longest stretch of text shown in a [`VerwatchError::NoMatch`] message.
const PREVIEW_CHARS: usize = 200;

/// Core error type for verwatch operations.
#[derive(Debug, Error)]
pub enum VerwatchError {
    /// A version pattern did not match the text it was applied to.
    #[error("Pattern '{pattern}' did not match: {}", preview(.text))]
    NoMatch { pattern: String, text: String },

    /// A version pattern matched but has no capture group to extract.
    #[error("Pattern '{pattern}' has no capture group")]
    MissingCaptureGroup { pattern: String },

    /// A pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The directory of a dynamic executable does not exist.
    #[error("Directory not found: {directory}")]
    DirectoryNotFound { directory: PathBuf },

    /// No file in the directory matched the executable pattern.
    #[error("No file in {directory} matches '{regex}'")]
    NoExecutableMatch { directory: PathBuf, regex: String },

    /// The command could not be spawned or exited unsuccessfully.
    #[error("Command '{command}' failed: {message}")]
    CommandExecution { command: String, message: String },

    /// The command ran longer than the configured timeout and was killed.
    #[error("Command '{command}' timed out after {timeout:?}")]
    CommandTimedOut { command: String, timeout: Duration },

    /// Fetching a URL failed at the transport level.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The stored schema version is newer than any known migration.
    #[error("Cannot migrate from version {current}: only {available} migrations are known")]
    InvalidStartVersion { current: usize, available: usize },

    /// A migration step failed. `step` is 1-based.
    #[error("Migration {step} failed: {message}")]
    MigrationFailed { step: usize, message: String },

    /// The software list could not be read.
    #[error("Failed to read {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    /// The software list is not valid JSON.
    #[error("Failed to parse {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    /// The software list is valid JSON but has the wrong top-level shape.
    #[error("Invalid software list {path}: {defect}")]
    InvalidFile { path: PathBuf, defect: String },

    /// A stored record failed validation.
    #[error("{}", describe_record(.index, .name, .defect))]
    InvalidRecord {
        index: usize,
        name: Option<String>,
        defect: RecordDefect,
    },

    /// The software list could not be written.
    #[error("Failed to write {path}: {message}")]
    FileWrite { path: PathBuf, message: String },

    /// An entry with this name already exists.
    #[error("Software '{name}' already exists")]
    DuplicateName { name: String },

    /// No entry with this name exists.
    #[error("Software '{name}' not found")]
    NotFound { name: String },

    /// An entry name was empty.
    #[error("Software name cannot be empty")]
    EmptyName,

    /// A configuration value could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for verwatch operations.
pub type Result<T> = std::result::Result<T, VerwatchError>;

/// The first defect found in a stored software record.
///
/// Validation checks fields in the order these variants are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordDefect {
    MissingName,
    MissingExecutable,
    MissingExecutableKind,
    MissingExecutableRegex,
    AmbiguousExecutable,
    InvalidExecutableDirectory,
    MissingInstalledRegex,
    MissingUrl,
    MissingLatestRegex,
    InvalidArgs,
    InvalidShell,
}

impl fmt::Display for RecordDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecordDefect::MissingName => "is missing a name",
            RecordDefect::MissingExecutable => "is missing an executable",
            RecordDefect::MissingExecutableKind => {
                "has an executable with neither a command nor a regex"
            }
            RecordDefect::MissingExecutableRegex => {
                "has an executable with a directory but no regex"
            }
            RecordDefect::AmbiguousExecutable => {
                "has an executable with both a command and a regex"
            }
            RecordDefect::MissingInstalledRegex => "is missing installedRegex",
            RecordDefect::MissingUrl => "is missing url",
            RecordDefect::MissingLatestRegex => "is missing latestRegex",
            RecordDefect::InvalidExecutableDirectory => {
                "has an executable directory that is not a string"
            }
            RecordDefect::InvalidArgs => "has args that are not a string",
            RecordDefect::InvalidShell => "has a shell that is not a string",
        };
        f.write_str(text)
    }
}

fn describe_record(index: &usize, name: &Option<String>, defect: &RecordDefect) -> String {
    match name {
        Some(name) => format!("Software '{}' {}", name, defect),
        None => format!("Software at index {} {}", index, defect),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return format!("{:?}", text);
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{:?}...", head)
}
