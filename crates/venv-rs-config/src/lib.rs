use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Prefix for environment variable overrides, e.g. `VENV_RS_PYTHON=python3.12`
/// or `VENV_RS_SCAN__MAX_DEPTH=6`.
pub const ENV_PREFIX: &str = "VENV_RS";

/// Error types for configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings of the environment manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagerSettings {
    /// Folder where new environments are created as `venv-<name>`
    pub venv_dir: PathBuf,
    /// Interpreter whose `-m venv` creates new environments
    pub python: String,
    pub terminal: TerminalSettings,
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalSettings {
    /// Terminal emulator to open. Autodetected from `PATH` when unset.
    pub command: Option<String>,
    /// Shell started inside the terminal once the environment is sourced
    pub shell: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSettings {
    pub max_depth: Option<usize>,
    /// Directory names never descended into
    pub exclude: Vec<String>,
    pub follow_links: bool,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            venv_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("venvs"),
            python: default_python().to_string(),
            terminal: TerminalSettings::default(),
            scan: ScanSettings::default(),
        }
    }
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            command: None,
            shell: "bash".to_string(),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_depth: None,
            exclude: ["node_modules", ".git", ".cache", ".Trash"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            follow_links: false,
        }
    }
}

impl ScanSettings {
    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude.iter().any(|name| name == dir_name)
    }
}

#[cfg(windows)]
fn default_python() -> &'static str {
    "python"
}

#[cfg(not(windows))]
fn default_python() -> &'static str {
    "python3"
}

impl ManagerSettings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("venv-rs")
            .join("manager.toml")
    }

    /// Load from the default location, falling back to defaults on error.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings from {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Layer the file at `path` (if present) and `VENV_RS_*` variables over the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading settings from {:?}", path);

        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings = ManagerSettings::load_from(&temp_dir.path().join("absent.toml")).unwrap();

        let defaults = ManagerSettings::default();
        assert_eq!(settings.venv_dir, defaults.venv_dir);
        assert_eq!(settings.terminal.shell, "bash");
        assert!(settings.scan.is_excluded("node_modules"));
        assert!(!settings.scan.is_excluded(".venv"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("manager.toml");
        std::fs::write(
            &path,
            r#"
venv_dir = "/opt/envs"
python = "python3.12"

[terminal]
command = "alacritty"

[scan]
max_depth = 6
exclude = ["Library"]
"#,
        )
        .unwrap();

        let settings = ManagerSettings::load_from(&path).unwrap();
        assert_eq!(settings.venv_dir, PathBuf::from("/opt/envs"));
        assert_eq!(settings.python, "python3.12");
        assert_eq!(settings.terminal.command.as_deref(), Some("alacritty"));
        assert_eq!(settings.terminal.shell, "bash");
        assert_eq!(settings.scan.max_depth, Some(6));
        assert!(settings.scan.is_excluded("Library"));
        assert!(!settings.scan.is_excluded("node_modules"));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("manager.toml");

        let mut settings = ManagerSettings::default();
        settings.venv_dir = temp_dir.path().join("envs");
        settings.terminal.shell = "zsh".to_string();
        settings.save_to(&path).unwrap();

        let loaded = ManagerSettings::load_from(&path).unwrap();
        assert_eq!(loaded.venv_dir, settings.venv_dir);
        assert_eq!(loaded.terminal.shell, "zsh");
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("manager.toml");
        std::fs::write(&path, "venv_dir = [").unwrap();

        assert!(matches!(
            ManagerSettings::load_from(&path),
            Err(ConfigError::Load(_))
        ));
    }
}
