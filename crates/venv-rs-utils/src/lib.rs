use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;
use tokio::process;
use tracing::debug;

/// Error types for utilities
#[derive(Error, Debug)]
pub enum UtilError {
    #[error("`{command}` exited with {}{}", exit_code_text(.code), stderr_suffix(.stderr))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

fn describe<I, S>(command: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = command.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Process utilities
pub struct ProcessUtils;

impl ProcessUtils {
    /// Run a command to completion and return its stdout.
    ///
    /// stderr is captured so that a failing command can report why it failed.
    pub async fn execute_command<I, S>(command: &str, args: I) -> Result<String, UtilError>
    where
        I: IntoIterator<Item = S> + Clone,
        S: AsRef<OsStr>,
    {
        let line = describe(command, args.clone());
        debug!("Running {}", line);

        let output = process::Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| UtilError::Spawn {
                command: line.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(UtilError::ProcessFailed {
                command: line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }

    /// Start a command without waiting for it. Stdio is detached from ours.
    pub fn spawn_detached<I, S>(command: &str, args: I) -> Result<(), UtilError>
    where
        I: IntoIterator<Item = S> + Clone,
        S: AsRef<OsStr>,
    {
        let line = describe(command, args.clone());
        debug!("Spawning {}", line);

        StdCommand::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|source| UtilError::Spawn {
                command: line,
                source,
            })
    }

    /// Locate an executable on `PATH`.
    pub fn find_in_path(command: &str) -> Option<PathBuf> {
        let path = std::env::var_os("PATH")?;
        Self::find_in(command, path)
    }

    /// Locate an executable in the `PATH`-style list `search_path`.
    ///
    /// Only files the current user may execute match; on Windows `PATHEXT`
    /// extensions are tried as well.
    pub fn find_in(command: &str, search_path: impl AsRef<OsStr>) -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        match which::which_in(command, Some(search_path), cwd) {
            Ok(found) => Some(found),
            Err(e) => {
                debug!("{} not found: {}", command, e);
                None
            }
        }
    }
}

/// File system utilities
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Validate filename
    pub fn is_valid_filename(filename: &str) -> bool {
        let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
        !filename.chars().any(|c| invalid_chars.contains(&c) || c.is_control())
            && !filename.is_empty()
            && filename != "."
            && filename != ".."
            && filename.len() <= 255
    }
}
