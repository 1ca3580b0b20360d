//! Locating and running the executables whose versions are checked.

pub mod command;
pub mod executable;
pub mod platform;

pub use command::{command_line, CommandRunner, Invocation};
pub use executable::{find_match, resolve, resolve_in};
pub use platform::{select_shell, ShellInfo, ShellType};
