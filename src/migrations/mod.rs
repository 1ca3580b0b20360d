//! Schema migrations for the stored software list.
//!
//! Each migration is a pure function that upgrades raw records from one
//! schema generation to the next. A file's `version` counts how many of
//! [`MIGRATIONS`] have already been applied to it; [`Upgrader::run`] applies
//! the rest, in order.
//!
//! New migrations are only ever appended. A migration never learns its own
//! position in the list.

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, VerwatchError};

mod blank_options;
mod executable_object;
mod optional_directory;

/// A transform from one schema generation to the next.
pub type Migration = fn(Vec<Value>) -> anyhow::Result<Vec<Value>>;

/// Every known migration, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    executable_object::migrate,
    optional_directory::migrate,
    blank_options::migrate,
];

/// Schema version of a fully migrated file.
pub const CURRENT_VERSION: usize = MIGRATIONS.len();

/// Applies pending migrations to raw records.
pub struct Upgrader;

impl Upgrader {
    /// Upgrade `records` stored at `current_version` by running
    /// `migrations[current_version..]` in order.
    ///
    /// `records` is never modified; migrations work on a copy. If a step
    /// fails, nothing from earlier steps is returned and later steps do not
    /// run.
    pub fn run(
        records: &[Value],
        current_version: usize,
        migrations: &[Migration],
    ) -> Result<Vec<Value>> {
        if current_version > migrations.len() {
            return Err(VerwatchError::InvalidStartVersion {
                current: current_version,
                available: migrations.len(),
            });
        }

        let mut upgraded = records.to_vec();
        for (index, migration) in migrations.iter().enumerate().skip(current_version) {
            let step = index + 1;
            debug!("Applying migration {} of {}", step, migrations.len());
            upgraded = migration(upgraded).map_err(|e| VerwatchError::MigrationFailed {
                step,
                message: format!("{:#}", e),
            })?;
        }

        Ok(upgraded)
    }
}
