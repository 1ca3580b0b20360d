//! Command execution for installed-version checks.
//!
//! Two invocation modes are available:
//!
//! - [`Invocation::Shell`] joins the executable and its arguments into one
//!   command line (`"<executable> <args>"`) and hands it to a shell. This is
//!   what stored entries have always done, and it lets arguments use pipes,
//!   globs and variables. Nothing is escaped, so shell metacharacters in the
//!   arguments are interpreted by the shell.
//! - [`Invocation::Direct`] splits the arguments with POSIX shell-word rules
//!   and spawns the executable itself, with no shell in between. Arguments
//!   reach the program verbatim; the entry's shell override is ignored.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::platform::select_shell;
use crate::error::{Result, VerwatchError};

/// How often a command with a timeout is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How a command line reaches the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Invocation {
    /// Run `"<executable> <args>"` through a shell.
    #[default]
    Shell,
    /// Spawn the executable with an argument vector, without a shell.
    Direct,
}

/// Runs version commands and returns their trimmed stdout.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    invocation: Invocation,
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// Create a runner that uses a shell and waits indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given invocation mode.
    pub fn with_invocation(mut self, invocation: Invocation) -> Self {
        self.invocation = invocation;
        self
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the invocation mode.
    pub fn invocation(&self) -> Invocation {
        self.invocation
    }

    /// Get the timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `executable` with `args` in `working_directory`.
    ///
    /// `shell` overrides the platform default shell in [`Invocation::Shell`]
    /// mode. An empty working directory means the current directory.
    pub fn run(
        &self,
        working_directory: &Path,
        executable: &str,
        args: Option<&str>,
        shell: Option<&str>,
    ) -> Result<String> {
        let line = command_line(executable, args);
        let mut cmd = self.build(working_directory, executable, args, shell, &line)?;

        if !working_directory.as_os_str().is_empty() {
            cmd.current_dir(working_directory);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!("Running '{}' in {}", line, working_directory.display());

        let (status, stdout, stderr) = match self.timeout {
            None => {
                let output = cmd.output().map_err(|e| spawn_error(&line, e))?;
                (output.status, output.stdout, output.stderr)
            }
            Some(timeout) => {
                // Own process group, so a timeout can stop everything the
                // command line started.
                #[cfg(unix)]
                {
                    use std::os::unix::process::CommandExt;
                    cmd.process_group(0);
                }
                let child = cmd.spawn().map_err(|e| spawn_error(&line, e))?;
                wait_with_timeout(child, &line, timeout)?
            }
        };

        let stdout = String::from_utf8_lossy(&stdout);
        let stderr = String::from_utf8_lossy(&stderr);

        if status.success() {
            Ok(stdout.trim().to_string())
        } else {
            let message = failure_message(status, stderr.trim());
            warn!("Command '{}' failed: {}", line, message);
            Err(VerwatchError::CommandExecution {
                command: line,
                message,
            })
        }
    }

    fn build(
        &self,
        working_directory: &Path,
        executable: &str,
        args: Option<&str>,
        shell: Option<&str>,
        line: &str,
    ) -> Result<Command> {
        match self.invocation {
            Invocation::Shell => {
                let shell = select_shell(shell);
                let mut cmd = Command::new(&shell.executable);
                cmd.arg(shell.command_flag());
                cmd.arg(line);
                Ok(cmd)
            }
            Invocation::Direct => {
                let argv = shell_words::split(args.unwrap_or_default()).map_err(|e| {
                    VerwatchError::CommandExecution {
                        command: line.to_string(),
                        message: format!("cannot split arguments: {}", e),
                    }
                })?;
                let mut cmd = Command::new(program_path(working_directory, executable));
                cmd.args(argv);
                Ok(cmd)
            }
        }
    }
}

/// Join an executable and its arguments into one command line.
///
/// Blank arguments are left out so the line has no trailing space.
pub fn command_line(executable: &str, args: Option<&str>) -> String {
    match args.map(str::trim).filter(|a| !a.is_empty()) {
        Some(args) => format!("{} {}", executable, args),
        None => executable.to_string(),
    }
}

/// Relative paths with a directory part are anchored at the working
/// directory; bare names are left for a PATH lookup.
fn program_path(working_directory: &Path, executable: &str) -> PathBuf {
    let path = Path::new(executable);
    if path.is_relative() && path.components().count() > 1 {
        working_directory.join(path)
    } else {
        path.to_path_buf()
    }
}

fn spawn_error(line: &str, error: std::io::Error) -> VerwatchError {
    VerwatchError::CommandExecution {
        command: line.to_string(),
        message: format!("failed to start: {}", error),
    }
}

fn failure_message(status: ExitStatus, stderr: &str) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match status.code() {
        Some(code) => format!("exited with code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn spawn_reader<R>(mut reader: R) -> thread::JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

/// Kill `child` and, on Unix, the rest of its process group.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill() only sends a signal; a negative pid names the
            // process group the child leads.
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
}

fn wait_with_timeout(
    mut child: Child,
    line: &str,
    timeout: Duration,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let started = Instant::now();

    let stdout_handle = child.stdout.take().map(spawn_reader);
    let stderr_handle = child.stderr.take().map(spawn_reader);

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            kill_tree(&mut child);
            let _ = child.wait();
            warn!("Command '{}' timed out after {:?}", line, timeout);
            return Err(VerwatchError::CommandTimedOut {
                command: line.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok((status, stdout, stderr))
}
