//! Validation of a parsed software list.
//!
//! Checks run in a fixed order and stop at the first defect, so a broken
//! file always produces the same message.

use std::path::Path;

use serde_json::{Map, Value};

use super::entry::{Entry, Executable};
use crate::error::{RecordDefect, Result, VerwatchError};

/// The top level of a stored file, before migration.
#[derive(Debug)]
pub struct RawFile {
    /// Number of migrations already applied.
    pub version: usize,
    /// Records as stored.
    pub records: Vec<Value>,
}

/// Check the top-level shape of a stored file.
pub fn validate_file(path: &Path, root: Value) -> Result<RawFile> {
    let invalid = |defect: &str| VerwatchError::InvalidFile {
        path: path.to_path_buf(),
        defect: defect.to_string(),
    };

    let Value::Object(mut root) = root else {
        return Err(invalid("top level is not an object"));
    };

    let records = match root.remove("softwares") {
        None => return Err(invalid("missing `softwares` property")),
        Some(Value::Array(records)) => records,
        Some(_) => return Err(invalid("`softwares` is not an array")),
    };

    let version = match root.get("version") {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| invalid("`version` is not a non-negative integer"))?,
    };

    Ok(RawFile { version, records })
}

/// Turn one migrated record into an [`Entry`].
///
/// Defects are checked in this order: name, executable presence,
/// executable kind and directory, `installedRegex`, `url`, `latestRegex`,
/// then the optional `args` and `shell`, which must be strings when set.
pub fn validate_record(index: usize, record: &Value) -> Result<Entry> {
    let fail = |name: Option<&str>, defect: RecordDefect| VerwatchError::InvalidRecord {
        index,
        name: name.map(str::to_string),
        defect,
    };

    let Some(fields) = record.as_object() else {
        return Err(fail(None, RecordDefect::MissingName));
    };
    let Some(name) = text(fields, "name") else {
        return Err(fail(None, RecordDefect::MissingName));
    };
    let named = |defect| fail(Some(name), defect);

    let executable = match fields.get("executable") {
        None | Some(Value::Null) => return Err(named(RecordDefect::MissingExecutable)),
        Some(Value::Object(executable)) => parse_executable(executable).map_err(named)?,
        Some(_) => return Err(named(RecordDefect::MissingExecutableKind)),
    };

    let installed_regex =
        text(fields, "installedRegex").ok_or_else(|| named(RecordDefect::MissingInstalledRegex))?;
    let url = text(fields, "url").ok_or_else(|| named(RecordDefect::MissingUrl))?;
    let latest_regex =
        text(fields, "latestRegex").ok_or_else(|| named(RecordDefect::MissingLatestRegex))?;

    let args = optional(fields, "args", RecordDefect::InvalidArgs).map_err(named)?;
    let shell = optional(fields, "shell", RecordDefect::InvalidShell).map_err(named)?;

    let mut entry = Entry::new(name, executable, installed_regex, url, latest_regex);
    if let Some(args) = args {
        entry = entry.with_args(args);
    }
    if let Some(shell) = shell {
        entry = entry.with_shell(shell);
    }
    Ok(entry)
}

/// Check an entry built in code against the rules a stored record must meet,
/// so that anything saved can be loaded again.
pub fn validate_entry(index: usize, entry: &Entry) -> Result<()> {
    let record = serde_json::to_value(entry).map_err(anyhow::Error::from)?;
    validate_record(index, &record).map(|_| ())
}

fn parse_executable(fields: &Map<String, Value>) -> std::result::Result<Executable, RecordDefect> {
    let directory = optional(fields, "directory", RecordDefect::InvalidExecutableDirectory);
    match (text(fields, "command"), text(fields, "regex")) {
        (Some(_), Some(_)) => Err(RecordDefect::AmbiguousExecutable),
        (Some(command), None) => Ok(Executable::fixed(command)),
        (None, Some(regex)) => Ok(Executable::scan(directory?, regex)),
        (None, None) if present(fields, "directory") => Err(RecordDefect::MissingExecutableRegex),
        (None, None) => Err(RecordDefect::MissingExecutableKind),
    }
}

/// An optional string field. Absent and null are both unset.
fn optional<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    defect: RecordDefect,
) -> std::result::Result<Option<&'a str>, RecordDefect> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(defect),
    }
}

fn present(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).is_some_and(|value| !value.is_null())
}

/// A present, non-empty string field.
fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
