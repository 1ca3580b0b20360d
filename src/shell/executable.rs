//! Resolving executable descriptors to runnable paths.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, VerwatchError};
use crate::store::Executable;
use crate::version::compile;

/// Resolve `executable` against the current working directory.
///
/// Static commands come back unchanged; they are looked up when they run.
/// Dynamic executables resolve to the matching file joined with the
/// scanned directory.
pub fn resolve(executable: &Executable) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    resolve_in(executable, &cwd)
}

/// Resolve `executable`, scanning `cwd` when a dynamic executable has no
/// directory of its own.
pub fn resolve_in(executable: &Executable, cwd: &Path) -> Result<PathBuf> {
    match executable {
        Executable::Static { command } => Ok(PathBuf::from(command)),
        Executable::Dynamic { directory, regex } => {
            let directory = effective_directory(directory.as_deref(), cwd);
            let name = find_match(&directory, regex)?;
            Ok(directory.join(name))
        }
    }
}

/// Return the name of the first file in `directory` matching `regex`.
///
/// Names are visited in sorted order so the choice is the same on every
/// file system. Later matches are ignored.
pub fn find_match(directory: &Path, regex: &str) -> Result<String> {
    if !directory.is_dir() {
        return Err(VerwatchError::DirectoryNotFound {
            directory: directory.to_path_buf(),
        });
    }

    let pattern = compile(regex)?;

    let mut names: Vec<String> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let found = names.into_iter().find(|name| pattern.is_match(name));
    debug!(
        "Scanned {} for '{}': {:?}",
        directory.display(),
        regex,
        found
    );

    found.ok_or_else(|| VerwatchError::NoExecutableMatch {
        directory: directory.to_path_buf(),
        regex: regex.to_string(),
    })
}

fn effective_directory(directory: Option<&str>, cwd: &Path) -> PathBuf {
    match directory.filter(|d| !d.is_empty()) {
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), "").unwrap();
        }
    }

    #[test]
    fn static_command_is_returned_unchanged() {
        let path = resolve(&Executable::fixed("definitely-not-installed")).unwrap();
        assert_eq!(path, PathBuf::from("definitely-not-installed"));
    }

    #[test]
    fn first_match_wins() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), &["good-command.js", "bad-command.js"]);

        let exe = Executable::scan(Some(temp.path().to_string_lossy()), ".*-command.js");
        let path = resolve(&exe).unwrap();

        assert_eq!(path, temp.path().join("bad-command.js"));
    }

    #[test]
    fn find_match_returns_bare_name() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), &["readme.md", "tool-2.1.0"]);

        let name = find_match(temp.path(), r"tool-\d").unwrap();

        assert_eq!(name, "tool-2.1.0");
    }

    #[test]
    fn missing_directory_defaults_to_cwd() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), &["app-1.0.AppImage"]);

        let exe = Executable::scan(None::<String>, r"\.AppImage$");
        let path = resolve_in(&exe, temp.path()).unwrap();

        assert_eq!(path, temp.path().join("app-1.0.AppImage"));
    }

    #[test]
    fn empty_directory_defaults_to_cwd() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), &["app"]);

        let exe = Executable::scan(Some(""), "^app$");
        let path = resolve_in(&exe, temp.path()).unwrap();

        assert_eq!(path, temp.path().join("app"));
    }

    #[test]
    fn relative_directory_is_joined_with_cwd() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("bin")).unwrap();
        touch(&temp.path().join("bin"), &["tool"]);

        let exe = Executable::scan(Some("bin"), "tool");
        let path = resolve_in(&exe, temp.path()).unwrap();

        assert_eq!(path, temp.path().join("bin").join("tool"));
    }

    #[test]
    fn nonexistent_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let exe = Executable::scan(Some(missing.to_string_lossy()), ".*");
        let err = resolve(&exe).unwrap_err();

        match err {
            VerwatchError::DirectoryNotFound { directory } => assert_eq!(directory, missing),
            other => panic!("Expected DirectoryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn no_match_is_error() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), &["readme.md"]);

        let err = find_match(temp.path(), r"\.exe$").unwrap_err();

        match err {
            VerwatchError::NoExecutableMatch { directory, regex } => {
                assert_eq!(directory, temp.path());
                assert_eq!(regex, r"\.exe$");
            }
            other => panic!("Expected NoExecutableMatch, got {:?}", other),
        }
    }

    #[test]
    fn listing_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        touch(&temp.path().join("nested"), &["tool"]);

        let err = find_match(temp.path(), "^tool$").unwrap_err();

        assert!(matches!(err, VerwatchError::NoExecutableMatch { .. }));
    }

    #[test]
    fn invalid_regex_is_error() {
        let temp = TempDir::new().unwrap();
        let err = find_match(temp.path(), "(").unwrap_err();
        assert!(matches!(err, VerwatchError::InvalidPattern { .. }));
    }
}
