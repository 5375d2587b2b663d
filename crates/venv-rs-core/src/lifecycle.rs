use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use venv_rs_utils::{FileSystemUtils, ProcessUtils};

use crate::environment::{self, Environment};
use crate::error::VenvError;

/// Everything needed to create one environment, checked up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub path: PathBuf,
    pub python: String,
}

impl CreateRequest {
    /// Validate `name` and resolve the folder it would occupy in `venv_dir`.
    pub fn new(venv_dir: &Path, name: &str, python: &str) -> Result<Self, VenvError> {
        let name = validate_name(name)?;
        let path = venv_dir.join(environment::managed_dir_name(&name));

        if path.exists() {
            return Err(VenvError::AlreadyExists { name, path });
        }

        Ok(Self {
            name,
            path,
            python: python.to_string(),
        })
    }
}

/// Trim `name` and make sure it can be used as part of a folder name.
pub fn validate_name(name: &str) -> Result<String, VenvError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VenvError::EmptyName);
    }
    if !FileSystemUtils::is_valid_filename(&environment::managed_dir_name(name)) {
        return Err(VenvError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Run `<python> -m venv <path>` and return the new record.
pub async fn create_environment(request: CreateRequest) -> Result<Environment, VenvError> {
    let args: Vec<OsString> = vec![
        "-m".into(),
        "venv".into(),
        request.path.clone().into_os_string(),
    ];

    ProcessUtils::execute_command(&request.python, args)
        .await
        .map_err(|source| VenvError::Creation {
            name: request.name.clone(),
            source,
        })?;

    if !environment::python_path(&request.path).exists() {
        warn!("{} -m venv succeeded but left no interpreter in {:?}", request.python, request.path);
        return Err(VenvError::Incomplete { path: request.path });
    }

    info!("Created environment '{}' at {:?}", request.name, request.path);
    Ok(Environment::new(request.name, request.path))
}

/// Remove an environment folder and everything in it.
pub fn delete_environment(path: &Path) -> Result<(), VenvError> {
    std::fs::remove_dir_all(path).map_err(|source| VenvError::Delete {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Deleted environment at {:?}", path);
    Ok(())
}
