//! Runtime settings.
//!
//! Settings come from the environment and can be overridden by command-line
//! flags:
//!
//! - `VERWATCH_FILE`: path of the software list
//! - `VERWATCH_COMMAND_TIMEOUT`: seconds before a version command is killed
//! - `VERWATCH_FETCH_TIMEOUT`: seconds before a version page fetch gives up
//!
//! Timeouts are off unless set.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, VerwatchError};
use crate::shell::{CommandRunner, Invocation};
use crate::store::SoftwareList;
use crate::version::{HttpFetcher, VersionResolver};

pub const FILE_ENV: &str = "VERWATCH_FILE";
pub const COMMAND_TIMEOUT_ENV: &str = "VERWATCH_COMMAND_TIMEOUT";
pub const FETCH_TIMEOUT_ENV: &str = "VERWATCH_FETCH_TIMEOUT";

/// Name of the software list file inside the data directory.
const FILE_NAME: &str = "softwares.json";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the software list lives.
    pub data_file: PathBuf,

    /// How version commands are invoked.
    pub invocation: Invocation,

    /// Timeout for version commands.
    pub command_timeout: Option<Duration>,

    /// Timeout for version page fetches.
    pub fetch_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            invocation: Invocation::Shell,
            command_timeout: None,
            fetch_timeout: None,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps variable names to values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(file) = lookup(FILE_ENV).filter(|f| !f.trim().is_empty()) {
            settings.data_file = PathBuf::from(file);
        }
        settings.command_timeout = parse_seconds(COMMAND_TIMEOUT_ENV, lookup(COMMAND_TIMEOUT_ENV))?;
        settings.fetch_timeout = parse_seconds(FETCH_TIMEOUT_ENV, lookup(FETCH_TIMEOUT_ENV))?;

        Ok(settings)
    }

    /// Build a resolver honoring the configured invocation and timeouts.
    pub fn resolver(&self) -> VersionResolver {
        let mut runner = CommandRunner::new().with_invocation(self.invocation);
        if let Some(timeout) = self.command_timeout {
            runner = runner.with_timeout(timeout);
        }
        let mut fetcher = HttpFetcher::new();
        if let Some(timeout) = self.fetch_timeout {
            fetcher = fetcher.with_timeout(timeout);
        }
        VersionResolver::new(runner, fetcher)
    }

    /// Open (without loading) the configured software list.
    pub fn store(&self) -> SoftwareList {
        SoftwareList::new(&self.data_file)
    }
}

/// Default location of the software list: the platform data directory,
/// or `~/.verwatch` where there is none.
pub fn default_data_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("verwatch").join(FILE_NAME),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".verwatch")
            .join(FILE_NAME),
    }
}

fn parse_seconds(key: &str, value: Option<String>) -> Result<Option<Duration>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let timeout = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| *s > 0.0)
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .ok_or_else(|| VerwatchError::InvalidConfig {
            key: key.to_string(),
            value: value.clone(),
        })?;
    Ok(Some(timeout))
}
