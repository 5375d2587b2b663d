use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix of environment folders created in the managed folder.
pub const MANAGED_PREFIX: &str = "venv-";

/// Directory name conventionally used for a project-local environment.
pub const PROJECT_DIR_NAME: &str = ".venv";

/// Display name given to project-local `.venv` environments found by a scan.
pub const PROJECT_DISPLAY_NAME: &str = "project_dot_venv";

#[cfg(windows)]
pub const BIN_DIR: &str = "Scripts";
#[cfg(windows)]
pub const PYTHON_EXE: &str = "python.exe";

#[cfg(not(windows))]
pub const BIN_DIR: &str = "bin";
#[cfg(not(windows))]
pub const PYTHON_EXE: &str = "python";

pub const ACTIVATE_SCRIPT: &str = "activate";

/// A virtual environment as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub path: PathBuf,
}

impl Environment {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a record from a folder inside the managed folder.
    ///
    /// Returns `None` unless the folder name carries [`MANAGED_PREFIX`] followed
    /// by a non-empty name. Non-UTF-8 names are converted lossily, as for scans.
    pub fn from_managed_dir(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy();
        let name = managed_name(&file_name)?.to_string();
        Some(Self::new(name, path))
    }

    /// Build a record for an environment found by scanning.
    pub fn from_discovered_dir(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self::new(discovered_name(&file_name), path)
    }

    /// `name (path)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.path.display())
    }

    pub fn folder_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn activate_script(&self) -> PathBuf {
        activate_script(&self.path)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Name of an environment in the managed folder, `venv-data` -> `data`.
pub fn managed_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(MANAGED_PREFIX)
        .filter(|name| !name.is_empty())
}

/// Name of a scanned environment: managed prefix stripped, `.venv` renamed.
pub fn discovered_name(file_name: &str) -> String {
    if let Some(name) = managed_name(file_name) {
        name.to_string()
    } else if file_name == PROJECT_DIR_NAME {
        PROJECT_DISPLAY_NAME.to_string()
    } else {
        file_name.to_string()
    }
}

/// Folder name a new environment called `name` gets in the managed folder.
pub fn managed_dir_name(name: &str) -> String {
    format!("{}{}", MANAGED_PREFIX, name)
}

pub fn activate_script(env_path: &Path) -> PathBuf {
    env_path.join(BIN_DIR).join(ACTIVATE_SCRIPT)
}

pub fn python_path(env_path: &Path) -> PathBuf {
    env_path.join(BIN_DIR).join(PYTHON_EXE)
}

/// A directory is an environment when it has both an activation script and an interpreter.
pub fn is_environment(path: &Path) -> bool {
    activate_script(path).is_file() && python_path(path).exists()
}
