//! Integration tests for the software list public API.

use std::fs;

use serde_json::{json, Value};
use tempfile::TempDir;
use verwatch::migrations::{Migration, CURRENT_VERSION};
use verwatch::store::{Entry, Executable, SoftwareList};
use verwatch::VerwatchError;

fn git() -> Entry {
    Entry::new(
        "git",
        Executable::fixed("git"),
        r"version (\S+)",
        "https://git-scm.com/downloads",
        r"(\d+\.\d+\.\d+)",
    )
    .with_args("--version")
}

fn node() -> Entry {
    Entry::new(
        "node",
        Executable::scan(Some("bin"), r"^node(\.exe)?$"),
        r"v(\S+)",
        "https://nodejs.org/en",
        r"v(\d+\.\d+\.\d+)",
    )
    .with_args("--version")
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_file_is_created_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("softwares.json");

    let mut list = SoftwareList::new(&path);
    assert!(list.load().unwrap().is_empty());

    assert_eq!(
        read_json(&path),
        json!({ "version": CURRENT_VERSION, "softwares": [] })
    );
}

#[test]
fn empty_file_is_empty_list() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    fs::write(&path, "").unwrap();

    let mut list = SoftwareList::new(&path);
    assert!(list.load().unwrap().is_empty());
    assert_eq!(read_json(&path)["version"], json!(CURRENT_VERSION));
}

#[test]
fn saved_file_loads_back_unchanged() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");

    let mut list = SoftwareList::new(&path);
    list.load().unwrap();
    list.add(node()).unwrap();
    list.add(git()).unwrap();
    let written = fs::read_to_string(&path).unwrap();

    let mut reopened = SoftwareList::new(&path);
    let entries = reopened.load().unwrap().to_vec();

    assert_eq!(entries, vec![git(), node()]);
    assert_eq!(fs::read_to_string(&path).unwrap(), written);
}

#[test]
fn stored_entries_survive_add_from_new_handle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");

    let mut first = SoftwareList::new(&path);
    first.load().unwrap();
    first.add(git()).unwrap();
    first.add(node()).unwrap();

    let deno = Entry::new(
        "deno",
        Executable::fixed("deno"),
        r"deno (\S+)",
        "https://deno.com",
        r"v(\d+\.\d+\.\d+)",
    );
    SoftwareList::new(&path).add(deno.clone()).unwrap();

    let stored = SoftwareList::new(&path).load().unwrap().to_vec();
    assert_eq!(stored, vec![deno, git(), node()]);
}

#[test]
fn invalid_entry_is_not_persisted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");

    let mut list = SoftwareList::new(&path);
    list.load().unwrap();
    list.add(git()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = list
        .add(Entry::new("bad", Executable::fixed(""), "", "", ""))
        .unwrap_err();

    assert!(matches!(err, VerwatchError::InvalidRecord { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(SoftwareList::new(&path).load().unwrap(), &[git()]);
}

#[test]
fn legacy_file_is_upgraded_on_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    fs::write(
        &path,
        json!({
            "softwares": [{
                "name": "git",
                "executable": "git",
                "args": "--version",
                "shell": "",
                "installedRegex": r"version (\S+)",
                "url": "https://git-scm.com/downloads",
                "latestRegex": r"(\d+\.\d+\.\d+)"
            }]
        })
        .to_string(),
    )
    .unwrap();

    let mut list = SoftwareList::new(&path);
    assert_eq!(list.load().unwrap(), &[git()]);

    let stored = read_json(&path);
    assert_eq!(stored["version"], json!(CURRENT_VERSION));
    assert_eq!(stored["softwares"][0]["executable"], json!({ "command": "git" }));
    assert!(stored["softwares"][0].get("shell").is_none());
}

fn failing(_: Vec<Value>) -> anyhow::Result<Vec<Value>> {
    anyhow::bail!("boom")
}

fn identity(records: Vec<Value>) -> anyhow::Result<Vec<Value>> {
    Ok(records)
}

static FAILING_SECOND: &[Migration] = &[identity, failing];

#[test]
fn failed_migration_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    let original = r#"{"softwares": []}"#;
    fs::write(&path, original).unwrap();

    let mut list = SoftwareList::with_migrations(&path, FAILING_SECOND);
    let err = list.load().unwrap_err();

    match err {
        VerwatchError::MigrationFailed { step, message } => {
            assert_eq!(step, 2);
            assert!(message.contains("boom"));
        }
        other => panic!("Expected MigrationFailed, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn newer_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    let original = json!({ "version": CURRENT_VERSION + 1, "softwares": [] }).to_string();
    fs::write(&path, &original).unwrap();

    let err = SoftwareList::new(&path).load().unwrap_err();
    assert!(matches!(err, VerwatchError::InvalidStartVersion { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn invalid_record_is_reported_and_not_rewritten() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    let original = json!({
        "version": CURRENT_VERSION,
        "softwares": [{ "name": "git", "executable": { "command": "git" } }]
    })
    .to_string();
    fs::write(&path, &original).unwrap();

    let err = SoftwareList::new(&path).load().unwrap_err();
    assert_eq!(err.to_string(), "Software 'git' is missing installedRegex");
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    fs::write(&path, "{ not json").unwrap();

    let err = SoftwareList::new(&path).load().unwrap_err();
    assert!(matches!(err, VerwatchError::JsonParse { .. }));
}

#[test]
fn delete_with_empty_name_does_not_write() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");

    let mut list = SoftwareList::new(&path);
    list.load().unwrap();
    list.add(git()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(list.delete(""), Err(VerwatchError::EmptyName)));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(list.entries().len(), 1);
}

#[test]
fn edit_then_delete_round() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");

    let mut list = SoftwareList::new(&path);
    list.load().unwrap();
    list.add(git()).unwrap();
    let renamed = Entry::new(
        "Git SCM",
        Executable::fixed("/usr/bin/git"),
        r"version (\S+)",
        "https://git-scm.com/downloads",
        r"(\d+\.\d+\.\d+)",
    );
    list.edit(&git(), renamed.clone()).unwrap();
    assert_eq!(list.entries(), &[renamed]);

    list.delete("Git SCM").unwrap();
    assert!(SoftwareList::new(&path).load().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn loaded_silent_command_reports_empty_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("softwares.json");
    fs::write(
        &path,
        json!({
            "version": CURRENT_VERSION,
            "softwares": [{
                "name": "silent",
                "executable": { "command": "true" },
                "installedRegex": "(.*)",
                "url": "http://127.0.0.1:1/",
                "latestRegex": "(.*)"
            }]
        })
        .to_string(),
    )
    .unwrap();

    let mut list = SoftwareList::new(&path);
    list.load().unwrap();
    let entry = list.get("silent").unwrap();

    assert_eq!(entry.installed_version().unwrap(), "");
}
