//! Installed and latest version lookups for software entries.

use std::path::{Path, PathBuf};
use std::thread;

use tracing::debug;

use super::extract::{compile, extract};
use super::fetch::HttpFetcher;
use crate::error::{Result, VerwatchError};
use crate::shell::{resolve, CommandRunner};
use crate::store::Entry;

/// Looks up installed and latest versions.
///
/// Lookups only read the entry, so one resolver can serve many entries at
/// once (see [`VersionResolver::check_all`]).
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    runner: CommandRunner,
    fetcher: HttpFetcher,
}

impl VersionResolver {
    /// Create a resolver from a runner and a fetcher.
    pub fn new(runner: CommandRunner, fetcher: HttpFetcher) -> Self {
        Self { runner, fetcher }
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// Run the entry's executable and extract the installed version from
    /// its output.
    pub fn installed_version(&self, entry: &Entry) -> Result<String> {
        let pattern = compile(entry.installed_regex())?;
        let path = resolve(entry.executable())?;
        let (working_directory, executable) = split_executable(&path);

        let output = self.runner.run(
            &working_directory,
            &executable,
            entry.args(),
            entry.shell(),
        )?;

        let version = extract(&output, &pattern)?;
        debug!("{} installed version: {}", entry.name(), version);
        Ok(version)
    }

    /// Fetch the entry's URL and extract the latest version from the body.
    pub fn latest_version(&self, entry: &Entry) -> Result<String> {
        let pattern = compile(entry.latest_regex())?;
        let body = self.fetcher.fetch(entry.url())?;

        let version = extract(&body, &pattern)?;
        debug!("{} latest version: {}", entry.name(), version);
        Ok(version)
    }

    /// Look up both versions of one entry.
    pub fn check(&self, entry: &Entry) -> VersionReport {
        VersionReport {
            name: entry.name().to_string(),
            installed: self.installed_version(entry),
            latest: self.latest_version(entry),
        }
    }

    /// Check every entry concurrently. Reports keep the order of `entries`.
    pub fn check_all(&self, entries: &[Entry]) -> Vec<VersionReport> {
        thread::scope(|scope| {
            let handles: Vec<_> = entries
                .iter()
                .map(|entry| scope.spawn(move || self.check(entry)))
                .collect();

            handles
                .into_iter()
                .zip(entries)
                .map(|(handle, entry)| {
                    handle.join().unwrap_or_else(|_| VersionReport::panicked(entry))
                })
                .collect()
        })
    }
}

/// Both version lookups for one entry. Each keeps its own outcome.
#[derive(Debug)]
pub struct VersionReport {
    pub name: String,
    pub installed: Result<String>,
    pub latest: Result<String>,
}

impl VersionReport {
    /// Whether both lookups succeeded and disagree.
    pub fn update_available(&self) -> bool {
        match (&self.installed, &self.latest) {
            (Ok(installed), Ok(latest)) => installed != latest,
            _ => false,
        }
    }

    fn panicked(entry: &Entry) -> Self {
        let failure = || -> Result<String> {
            Err(VerwatchError::Other(anyhow::anyhow!(
                "version check for '{}' panicked",
                entry.name()
            )))
        };
        Self {
            name: entry.name().to_string(),
            installed: failure(),
            latest: failure(),
        }
    }
}

/// Split a resolved executable into the directory to run in and the name
/// to invoke there.
///
/// Bare commands run in the current directory and are found through PATH.
/// Paths run inside their own directory as `./<file name>`.
fn split_executable(path: &Path) -> (PathBuf, String) {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    match (parent, path.file_name()) {
        (Some(parent), Some(file_name)) => (
            parent.to_path_buf(),
            Path::new(".").join(file_name).to_string_lossy().into_owned(),
        ),
        _ => (PathBuf::new(), path.to_string_lossy().into_owned()),
    }
}
