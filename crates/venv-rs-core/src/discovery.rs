use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use venv_rs_config::ScanSettings;
use walkdir::WalkDir;

use crate::collection::EnvironmentList;
use crate::environment::{self, Environment};
use crate::error::VenvError;

/// Outcome of a recursive scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub environments: EnvironmentList,
    /// Entries the walk could not read, mostly permission errors
    pub inaccessible: usize,
}

impl ScanReport {
    pub fn found(&self) -> usize {
        self.environments.len()
    }
}

/// List the `venv-*` folders directly inside `dir`.
pub fn load_from_dir(dir: &Path) -> Result<EnvironmentList, VenvError> {
    let read_dir = fs::read_dir(dir).map_err(|source| VenvError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut list = EnvironmentList::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        match Environment::from_managed_dir(&path) {
            Some(env) => {
                list.insert(env);
            }
            None => debug!("Ignoring {:?}: no '{}' prefix", path, environment::MANAGED_PREFIX),
        }
    }

    list.sort_by_path();
    info!("Loaded {} environments from {:?}", list.len(), dir);
    Ok(list)
}

/// Walk `root` looking for environment directories.
///
/// The walk never descends into an environment it found, nor into directories
/// named in `settings.exclude`. Unreadable entries are counted, not fatal.
pub fn scan_for_environments(root: &Path, settings: &ScanSettings) -> ScanReport {
    let mut report = ScanReport::default();

    let mut walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();
    if let Some(depth) = settings.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut entries = walker.into_iter();
    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Cannot access {:?}: {}", e.path(), e);
                report.inaccessible += 1;
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if entry.depth() > 0 {
            if let Some(name) = entry.file_name().to_str() {
                if settings.is_excluded(name) {
                    entries.skip_current_dir();
                    continue;
                }
            }
        }

        let path = entry.path();
        if environment::is_environment(path) {
            let env = Environment::from_discovered_dir(path);
            debug!("Found environment {}", env);
            report.environments.insert(env);
            entries.skip_current_dir();
        }
    }

    info!(
        "Scan of {:?} found {} environments ({} inaccessible entries)",
        root,
        report.found(),
        report.inaccessible
    );
    report
}
