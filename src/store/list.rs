//! The persisted list of tracked software.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::entry::Entry;
use super::validation::{validate_entry, validate_file, validate_record};
use crate::error::{Result, VerwatchError};
use crate::migrations::{Migration, Upgrader, MIGRATIONS};

/// On-disk shape of the software list.
#[derive(Serialize)]
struct StoredFile<'a> {
    version: usize,
    softwares: &'a [Entry],
}

/// The list of tracked software and the file that stores it.
///
/// Every change goes through [`SoftwareList::save`], so the file on disk is
/// always fully migrated and sorted by name after any mutation. `add`, `edit`
/// and `delete` load the file first if the list has not been loaded yet.
///
/// # Example
///
/// ```no_run
/// use verwatch::store::{Entry, Executable, SoftwareList};
///
/// let mut list = SoftwareList::new("/tmp/softwares.json");
/// list.load().unwrap();
/// list.add(Entry::new(
///     "git",
///     Executable::fixed("git"),
///     r"version (\S+)",
///     "https://git-scm.com/downloads",
///     r"(\d+\.\d+\.\d+)",
/// ).with_args("--version"))
/// .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SoftwareList {
    path: PathBuf,
    migrations: &'static [Migration],
    entries: Vec<Entry>,
    loaded: bool,
}

impl SoftwareList {
    /// Create a list stored at `path` using the registered migrations.
    ///
    /// Nothing is read until [`SoftwareList::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_migrations(path, MIGRATIONS)
    }

    /// Create a list that upgrades stored files with `migrations`.
    pub fn with_migrations(path: impl Into<PathBuf>, migrations: &'static [Migration]) -> Self {
        Self {
            path: path.into(),
            migrations,
            entries: Vec::new(),
            loaded: false,
        }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries currently held, sorted by name once loaded or saved.
    ///
    /// Empty until the list is loaded.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Find an entry by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Schema version written by [`SoftwareList::save`].
    pub fn schema_version(&self) -> usize {
        self.migrations.len()
    }

    /// Read, migrate and validate the stored file, then write it back at
    /// the current schema version.
    ///
    /// A missing or empty file is an empty list. Nothing is written if any
    /// step fails.
    pub fn load(&mut self) -> Result<&[Entry]> {
        self.entries.clear();
        self.loaded = false;

        if !self.path.exists() {
            debug!("No software list at {}", self.path.display());
            return self.save(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| VerwatchError::FileRead {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if content.is_empty() {
            return self.save(Vec::new());
        }

        let root: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| VerwatchError::JsonParse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let raw = validate_file(&self.path, root)?;
        if raw.version < self.migrations.len() {
            info!(
                "Upgrading {} from version {} to {}",
                self.path.display(),
                raw.version,
                self.migrations.len()
            );
        }
        let records = Upgrader::run(&raw.records, raw.version, self.migrations)?;

        let mut entries: Vec<Entry> = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let entry = validate_record(index, record)?;
            if entries.iter().any(|e| e.name() == entry.name()) {
                return Err(VerwatchError::DuplicateName {
                    name: entry.name().to_string(),
                });
            }
            entries.push(entry);
        }

        debug!("Loaded {} entries from {}", entries.len(), self.path.display());
        self.save(entries)
    }

    /// Sort `entries` by name, write them at the current schema version and
    /// make them the held list.
    pub fn save(&mut self, mut entries: Vec<Entry>) -> Result<&[Entry]> {
        sort_by_name(&mut entries);

        let write_error = |e: &dyn std::fmt::Display| VerwatchError::FileWrite {
            path: self.path.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(&e))?;
        }

        let file = StoredFile {
            version: self.migrations.len(),
            softwares: &entries,
        };
        let content = serde_json::to_string_pretty(&file).map_err(|e| write_error(&e))?;

        // Sibling temp file, then rename over the list.
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content).map_err(|e| write_error(&e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| write_error(&e))?;

        self.entries = entries;
        self.loaded = true;
        Ok(&self.entries)
    }

    /// Add a new entry.
    ///
    /// The entry must meet the same rules as a stored record.
    pub fn add(&mut self, entry: Entry) -> Result<&[Entry]> {
        if entry.name().is_empty() {
            return Err(VerwatchError::EmptyName);
        }
        self.ensure_loaded()?;
        validate_entry(self.entries.len(), &entry)?;
        if self.get(entry.name()).is_some() {
            return Err(VerwatchError::DuplicateName {
                name: entry.name().to_string(),
            });
        }

        let mut entries = self.entries.clone();
        entries.push(entry);
        self.save(entries)
    }

    /// Replace `old` with `new`.
    ///
    /// `new` may carry a different name as long as no other entry has it.
    pub fn edit(&mut self, old: &Entry, new: Entry) -> Result<&[Entry]> {
        self.ensure_loaded()?;
        let Some(position) = self.position(old.name()) else {
            return Err(VerwatchError::NotFound {
                name: old.name().to_string(),
            });
        };
        if new.name().is_empty() {
            return Err(VerwatchError::EmptyName);
        }
        validate_entry(position, &new)?;
        if new.name() != old.name() && self.get(new.name()).is_some() {
            return Err(VerwatchError::DuplicateName {
                name: new.name().to_string(),
            });
        }

        let mut entries = self.entries.clone();
        entries[position] = new;
        self.save(entries)
    }

    /// Remove the entry called `name`.
    pub fn delete(&mut self, name: &str) -> Result<&[Entry]> {
        if name.is_empty() {
            return Err(VerwatchError::EmptyName);
        }
        self.ensure_loaded()?;
        let Some(position) = self.position(name) else {
            return Err(VerwatchError::NotFound {
                name: name.to_string(),
            });
        };

        let mut entries = self.entries.clone();
        entries.remove(position);
        self.save(entries)
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.load()?;
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }
}

/// Sort entries by name, ignoring case. Equal names keep their order.
pub fn sort_by_name(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| e.name().to_lowercase());
}
