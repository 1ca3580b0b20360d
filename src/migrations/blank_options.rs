//! Version 3: unset `args` and `shell` are absent rather than blank.

use anyhow::Result;
use serde_json::Value;

const OPTIONAL_FIELDS: [&str; 2] = ["args", "shell"];

pub(super) fn migrate(mut records: Vec<Value>) -> Result<Vec<Value>> {
    for record in &mut records {
        let Some(fields) = record.as_object_mut() else {
            continue;
        };
        for key in OPTIONAL_FIELDS {
            let blank = match fields.get(key) {
                Some(Value::Null) => true,
                Some(Value::String(value)) => value.is_empty(),
                _ => false,
            };
            if blank {
                fields.remove(key);
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn removes_blank_options() {
        let out = migrate(vec![json!({ "name": "a", "args": "", "shell": null })]).unwrap();
        assert_eq!(out[0], json!({ "name": "a" }));
    }

    #[test]
    fn keeps_set_options() {
        let record = json!({ "name": "a", "args": "-v", "shell": "bash" });
        let out = migrate(vec![record.clone()]).unwrap();
        assert_eq!(out[0], record);
    }
}
