//! Platform-specific shell selection.

use std::path::{Path, PathBuf};

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Sh,
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Cmd,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "sh" | "dash" | "ash" => ShellType::Sh,
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "powershell" | "pwsh" => ShellType::PowerShell,
            "cmd" => ShellType::Cmd,
            _ => ShellType::Unknown,
        }
    }

    /// The flag that makes this shell run the next argument as a command line.
    pub fn command_flag(self) -> &'static str {
        match self {
            ShellType::Cmd => "/C",
            ShellType::PowerShell => "-Command",
            _ => "-c",
        }
    }
}

/// A shell to hand command lines to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    /// Shell executable path.
    pub executable: PathBuf,

    /// Shell kind, used to pick the command flag.
    pub kind: ShellType,
}

impl ShellInfo {
    /// Describe the shell at `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let kind = ShellType::from_executable(&executable.to_string_lossy());
        Self { executable, kind }
    }

    /// The flag to pass command lines with.
    pub fn command_flag(&self) -> &'static str {
        self.kind.command_flag()
    }
}

/// Pick the shell for a command: the override when given, else the
/// platform default.
///
/// The default is `/bin/sh` on Unix rather than `$SHELL`, so version checks
/// behave the same whichever login shell the user has.
pub fn select_shell(shell_override: Option<&str>) -> ShellInfo {
    match shell_override.map(str::trim).filter(|s| !s.is_empty()) {
        Some(shell) => ShellInfo::new(shell),
        None => ShellInfo::new(default_shell()),
    }
}

fn default_shell() -> PathBuf {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cmd.exe"))
    } else {
        PathBuf::from("/bin/sh")
    }
}
