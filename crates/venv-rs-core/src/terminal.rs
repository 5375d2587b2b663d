//! Opening a terminal with an environment activated.
//!
//! The command is built as plain data first so the platform differences stay
//! testable; [`launch`] only spawns it.

use std::path::{Path, PathBuf};
use tracing::info;
use venv_rs_config::TerminalSettings;
use venv_rs_utils::ProcessUtils;

use crate::environment::{self, BIN_DIR};
use crate::error::VenvError;

/// Emulators tried in order when none is configured.
pub const KNOWN_TERMINALS: &[&str] = &[
    "x-terminal-emulator",
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "alacritty",
    "kitty",
    "wezterm",
    "xterm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Build the command opening a terminal with the environment at `env_path` active.
///
/// `lookup` resolves emulator names to installed programs and is only consulted
/// on generic Unix when no emulator is configured.
pub fn activation_command<F>(
    platform: Platform,
    env_path: &Path,
    settings: &TerminalSettings,
    lookup: F,
) -> Result<ActivationCommand, VenvError>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    match platform {
        Platform::MacOs => {
            let script = applescript_escape(&shell_script(env_path, &settings.shell));
            Ok(ActivationCommand {
                program: "osascript".to_string(),
                args: vec![
                    "-e".to_string(),
                    format!("tell application \"Terminal\" to do script \"{}\"", script),
                    "-e".to_string(),
                    "tell application \"Terminal\" to activate".to_string(),
                ],
            })
        }
        Platform::Windows => {
            let activate = env_path.join(BIN_DIR).join("activate.bat");
            Ok(ActivationCommand {
                program: "cmd".to_string(),
                args: vec![
                    "/C".to_string(),
                    "start".to_string(),
                    String::new(),
                    "cmd".to_string(),
                    "/K".to_string(),
                    activate.to_string_lossy().to_string(),
                ],
            })
        }
        Platform::Unix => {
            let terminal = match &settings.command {
                Some(command) => command.clone(),
                None => KNOWN_TERMINALS
                    .iter()
                    .find(|&&name| lookup(name).is_some())
                    .map(|name| name.to_string())
                    .ok_or(VenvError::NoTerminal)?,
            };

            let mut args: Vec<String> = exec_flag(&terminal).iter().map(|s| s.to_string()).collect();
            args.push(settings.shell.clone());
            args.push("-c".to_string());
            args.push(shell_script(env_path, &settings.shell));

            Ok(ActivationCommand {
                program: terminal,
                args,
            })
        }
    }
}

/// Spawn the terminal without waiting for it.
pub fn launch(command: &ActivationCommand) -> Result<(), VenvError> {
    ProcessUtils::spawn_detached(&command.program, &command.args).map_err(VenvError::Activation)?;
    info!("Launched {}", command.program);
    Ok(())
}

/// Open a terminal for `env_path` on the current platform.
pub fn open_activated(env_path: &Path, settings: &TerminalSettings) -> Result<(), VenvError> {
    let command = activation_command(
        Platform::current(),
        env_path,
        settings,
        ProcessUtils::find_in_path,
    )?;
    launch(&command)
}

/// Arguments that make `terminal` run the rest of its command line.
fn exec_flag(terminal: &str) -> &'static [&'static str] {
    let name = Path::new(terminal)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(terminal);

    match name {
        "gnome-terminal" => &["--"],
        "xfce4-terminal" => &["-x"],
        "kitty" => &[],
        "wezterm" => &["start", "--"],
        _ => &["-e"],
    }
}

/// `. '<env>/bin/activate' && exec <shell>`, using `activate.fish` for fish.
fn shell_script(env_path: &Path, shell: &str) -> String {
    let shell_name = Path::new(shell)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(shell);

    if shell_name == "fish" {
        let script = env_path.join(BIN_DIR).join("activate.fish");
        format!(
            "source {}; and exec {}",
            shell_quote(&script.to_string_lossy()),
            shell
        )
    } else {
        let script = environment::activate_script(env_path);
        format!(". {} && exec {}", shell_quote(&script.to_string_lossy()), shell)
    }
}

/// Single-quote `value` for POSIX shells.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn applescript_escape(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', "\\\"")
}
