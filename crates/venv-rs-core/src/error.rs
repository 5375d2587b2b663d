use std::path::PathBuf;
use thiserror::Error;
use venv_rs_utils::UtilError;

/// Error types for environment operations
#[derive(Error, Debug)]
pub enum VenvError {
    #[error("Please enter a name for the new environment.")]
    EmptyName,

    #[error("'{name}' cannot be used as an environment name.")]
    InvalidName { name: String },

    #[error("Environment '{name}' already exists.")]
    AlreadyExists { name: String, path: PathBuf },

    #[error("{} is not in the current environment list.", .path.display())]
    NotListed { path: PathBuf },

    #[error("Could not read {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the home directory.")]
    HomeUnavailable,

    #[error("Failed to create environment: {source}")]
    Creation {
        name: String,
        #[source]
        source: UtilError,
    },

    #[error("Failed to create environment: no interpreter was found in {} afterwards.", .path.display())]
    Incomplete { path: PathBuf },

    #[error("Failed to delete: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open Terminal: {0}")]
    Activation(#[source] UtilError),

    #[error("Failed to open Terminal: no terminal emulator found on PATH. Set `terminal.command` in the settings.")]
    NoTerminal,
}
