//! Version 1: `executable` becomes an object.
//!
//! The oldest files stored the command as a bare string.

use anyhow::Result;
use serde_json::{json, Value};

pub(super) fn migrate(mut records: Vec<Value>) -> Result<Vec<Value>> {
    for record in &mut records {
        let Some(fields) = record.as_object_mut() else {
            continue;
        };
        let command = match fields.get("executable") {
            Some(Value::String(command)) => command.clone(),
            _ => continue,
        };
        fields.insert("executable".to_string(), json!({ "command": command }));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_string_executable() {
        let out = migrate(vec![json!({ "name": "a", "executable": "/usr/bin/a" })]).unwrap();
        assert_eq!(out[0]["executable"], json!({ "command": "/usr/bin/a" }));
    }

    #[test]
    fn leaves_object_executable_alone() {
        let record = json!({ "name": "a", "executable": { "regex": "a-.*" } });
        let out = migrate(vec![record.clone()]).unwrap();
        assert_eq!(out[0], record);
    }

    #[test]
    fn skips_non_object_records() {
        let out = migrate(vec![json!(42)]).unwrap();
        assert_eq!(out, vec![json!(42)]);
    }
}
