//! Persistent storage of tracked software.
//!
//! [`SoftwareList`] owns the list and its JSON file. Loading migrates and
//! validates whatever an older release wrote; saving always writes the
//! current schema, sorted by name.

pub mod entry;
pub mod list;
pub mod validation;

pub use entry::{Entry, Executable};
pub use list::{sort_by_name, SoftwareList};
pub use validation::{validate_entry, validate_file, validate_record, RawFile};
