//! Software entries.

use serde::Serialize;

use crate::error::Result;
use crate::version::VersionResolver;

/// How to find the program whose installed version is checked.
///
/// Stored as `{"command": ...}` for a fixed command and
/// `{"directory": ..., "regex": ...}` for a scanned one. Stored records are
/// read back through [`validate_record`](super::validate_record), which
/// tells the two shapes apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Executable {
    /// A fixed path or command, resolved when it runs.
    Static { command: String },

    /// The first file in `directory` whose name matches `regex`.
    ///
    /// Without a directory the current working directory is scanned.
    Dynamic {
        #[serde(skip_serializing_if = "Option::is_none")]
        directory: Option<String>,
        regex: String,
    },
}

impl Executable {
    /// A fixed command.
    pub fn fixed(command: impl Into<String>) -> Self {
        Executable::Static {
            command: command.into(),
        }
    }

    /// A file found by scanning `directory` for `regex`.
    pub fn scan(directory: Option<impl Into<String>>, regex: impl Into<String>) -> Self {
        Executable::Dynamic {
            directory: directory.map(Into::into),
            regex: regex.into(),
        }
    }

    /// Whether the executable is found by scanning a directory.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Executable::Dynamic { .. })
    }
}

/// A tracked program: how to read its installed version and where to look
/// up its latest one.
///
/// Entries are values. Editing one means building a replacement with the
/// same name and handing both to [`SoftwareList::edit`](super::SoftwareList::edit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    name: String,
    executable: Executable,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shell: Option<String>,
    installed_regex: String,
    url: String,
    latest_regex: String,
}

impl Entry {
    /// Create an entry without arguments or shell override.
    pub fn new(
        name: impl Into<String>,
        executable: Executable,
        installed_regex: impl Into<String>,
        url: impl Into<String>,
        latest_regex: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            executable,
            args: None,
            shell: None,
            installed_regex: installed_regex.into(),
            url: url.into(),
            latest_regex: latest_regex.into(),
        }
    }

    /// Set the arguments passed to the executable.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Set the shell the command runs through.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    pub fn shell(&self) -> Option<&str> {
        self.shell.as_deref()
    }

    pub fn installed_regex(&self) -> &str {
        &self.installed_regex
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn latest_regex(&self) -> &str {
        &self.latest_regex
    }

    /// Installed version, using a default [`VersionResolver`].
    pub fn installed_version(&self) -> Result<String> {
        VersionResolver::default().installed_version(self)
    }

    /// Latest version, using a default [`VersionResolver`].
    pub fn latest_version(&self) -> Result<String> {
        VersionResolver::default().latest_version(self)
    }
}
