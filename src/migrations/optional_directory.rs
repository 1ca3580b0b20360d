//! Version 2: the directory of a dynamic executable is optional.
//!
//! Files written while it was required carry empty or null directories
//! where the user wanted the working directory.

use anyhow::Result;
use serde_json::Value;

pub(super) fn migrate(mut records: Vec<Value>) -> Result<Vec<Value>> {
    for record in &mut records {
        let Some(executable) = record
            .get_mut("executable")
            .and_then(Value::as_object_mut)
        else {
            continue;
        };
        let blank = match executable.get("directory") {
            Some(Value::Null) => true,
            Some(Value::String(dir)) => dir.trim().is_empty(),
            _ => false,
        };
        if blank {
            executable.remove("directory");
        }
    }
    Ok(records)
}
