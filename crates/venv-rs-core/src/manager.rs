use std::path::{Path, PathBuf};
use tracing::{info, warn};
use venv_rs_config::{ManagerSettings, ScanSettings};

use crate::collection::EnvironmentList;
use crate::discovery::{self, ScanReport};
use crate::environment::Environment;
use crate::error::VenvError;
use crate::lifecycle::{self, CreateRequest};
use crate::terminal;

/// Where the current listing came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    Directory(PathBuf),
    HomeScan(PathBuf),
}

/// Owner of the environment list shown to the user.
///
/// Every refresh, scan or folder change replaces the list as a whole; creating
/// and deleting edit it in place for the one entry they touch.
#[derive(Debug)]
pub struct VenvManager {
    settings: ManagerSettings,
    venv_dir: PathBuf,
    source: ListSource,
    environments: EnvironmentList,
}

impl VenvManager {
    pub fn new(settings: ManagerSettings) -> Self {
        let venv_dir = absolute(&settings.venv_dir);
        Self {
            source: ListSource::Directory(venv_dir.clone()),
            venv_dir,
            settings,
            environments: EnvironmentList::new(),
        }
    }

    /// Create the managed folder if needed and list it.
    pub fn initialize(&mut self) -> Result<usize, VenvError> {
        std::fs::create_dir_all(&self.venv_dir).map_err(|source| VenvError::ReadDir {
            path: self.venv_dir.clone(),
            source,
        })?;
        self.reload()
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn venv_dir(&self) -> &Path {
        &self.venv_dir
    }

    pub fn source(&self) -> &ListSource {
        &self.source
    }

    pub fn environments(&self) -> &EnvironmentList {
        &self.environments
    }

    /// Rebuild the list from the managed folder.
    ///
    /// Only directory listings are reloaded here; a home scan is rerun by the
    /// caller through [`scan_root`](Self::scan_root) and [`apply_scan`](Self::apply_scan).
    pub fn reload(&mut self) -> Result<usize, VenvError> {
        self.environments = discovery::load_from_dir(&self.venv_dir)?;
        self.source = ListSource::Directory(self.venv_dir.clone());
        Ok(self.environments.len())
    }

    /// Switch to another managed folder and list it.
    pub fn change_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, VenvError> {
        let dir = absolute(dir.as_ref());
        let environments = discovery::load_from_dir(&dir)?;

        info!("Managed folder is now {:?}", dir);
        self.venv_dir = dir;
        self.settings.venv_dir = self.venv_dir.clone();
        self.environments = environments;
        self.source = ListSource::Directory(self.venv_dir.clone());
        Ok(self.environments.len())
    }

    pub fn scan_root(&self) -> Result<PathBuf, VenvError> {
        dirs::home_dir().ok_or(VenvError::HomeUnavailable)
    }

    pub fn scan_settings(&self) -> &ScanSettings {
        &self.settings.scan
    }

    /// Take over the result of a home scan started by the user.
    ///
    /// An empty result leaves the current listing untouched. Returns whether
    /// the list was replaced.
    pub fn apply_scan(&mut self, root: PathBuf, report: ScanReport) -> bool {
        if report.environments.is_empty() {
            return false;
        }
        self.refresh_scan(root, report);
        true
    }

    /// Replace the list with a rerun of the home scan, even when it found nothing.
    pub fn refresh_scan(&mut self, root: PathBuf, report: ScanReport) -> usize {
        self.environments = report.environments;
        self.source = ListSource::HomeScan(root);
        self.environments.len()
    }

    pub fn prepare_create(&self, name: &str) -> Result<CreateRequest, VenvError> {
        CreateRequest::new(&self.venv_dir, name, &self.settings.python)
    }

    pub fn record_created(&mut self, env: Environment) {
        if !self.environments.insert(env.clone()) {
            warn!("{} was already listed", env);
        }
    }

    /// Open a terminal with the listed environment at `path` activated.
    pub fn activate(&self, path: &Path) -> Result<Environment, VenvError> {
        let env = self.listed(path)?.clone();
        terminal::open_activated(&env.path, &self.settings.terminal)?;
        Ok(env)
    }

    /// Delete the listed environment at `path` from disk and from the list.
    pub fn delete(&mut self, path: &Path) -> Result<Environment, VenvError> {
        self.listed(path)?;
        lifecycle::delete_environment(path)?;
        self.environments
            .remove_by_path(path)
            .ok_or_else(|| VenvError::NotListed {
                path: path.to_path_buf(),
            })
    }

    fn listed(&self, path: &Path) -> Result<&Environment, VenvError> {
        self.environments
            .find_by_path(path)
            .ok_or_else(|| VenvError::NotListed {
                path: path.to_path_buf(),
            })
    }

    /// Text for the location label above the list.
    pub fn location_label(&self) -> String {
        match &self.source {
            ListSource::Directory(dir) => dir.display().to_string(),
            ListSource::HomeScan(_) => "~ (scanned from home)".to_string(),
        }
    }

    pub fn status_line(&self) -> String {
        match &self.source {
            ListSource::Directory(dir) => format!(
                "Loaded {} environments from {}.",
                self.environments.len(),
                dir.display()
            ),
            ListSource::HomeScan(_) => format!(
                "Scanned {} environments from home. Use 'Change Venv Folder' to switch back.",
                self.environments.len()
            ),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn manager_in(dir: &Path) -> VenvManager {
        let settings = ManagerSettings {
            venv_dir: dir.to_path_buf(),
            ..ManagerSettings::default()
        };
        VenvManager::new(settings)
    }

    fn names(manager: &VenvManager) -> Vec<String> {
        manager.environments().iter().map(|env| env.name.clone()).collect()
    }

    #[test]
    fn test_initialize_creates_managed_folder() {
        let temp_dir = tempdir().unwrap();
        let venv_dir = temp_dir.path().join("venvs");

        let mut manager = manager_in(&venv_dir);
        assert_eq!(manager.initialize().unwrap(), 0);
        assert!(venv_dir.is_dir());
        assert_eq!(
            manager.status_line(),
            format!("Loaded 0 environments from {}.", venv_dir.display())
        );
    }

    #[test]
    fn test_change_dir_rebuilds_list() {
        let temp_dir = tempdir().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir_all(first.join("venv-a")).unwrap();
        fs::create_dir_all(first.join("venv-b")).unwrap();
        fs::create_dir_all(second.join("venv-c")).unwrap();

        let mut manager = manager_in(&first);
        manager.initialize().unwrap();
        assert_eq!(names(&manager), vec!["a", "b"]);

        assert_eq!(manager.change_dir(&second).unwrap(), 1);
        assert_eq!(names(&manager), vec!["c"]);
        assert_eq!(manager.venv_dir(), second.as_path());
        assert_eq!(manager.source(), &ListSource::Directory(second.clone()));
        assert_eq!(manager.location_label(), second.display().to_string());
    }

    #[test]
    fn test_failed_change_dir_keeps_state() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("venv-a")).unwrap();

        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();
        assert!(manager.change_dir(temp_dir.path().join("missing")).is_err());
        assert_eq!(names(&manager), vec!["a"]);
        assert_eq!(manager.venv_dir(), temp_dir.path());
    }

    #[test]
    fn test_apply_scan_replaces_list() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("venv-a")).unwrap();
        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();

        let root = PathBuf::from("/home/me");
        assert!(!manager.apply_scan(root.clone(), ScanReport::default()));
        assert_eq!(names(&manager), vec!["a"]);

        let report = ScanReport {
            environments: vec![Environment::new("project_dot_venv", "/home/me/site/.venv")]
                .into_iter()
                .collect(),
            inaccessible: 2,
        };
        assert!(manager.apply_scan(root.clone(), report));
        assert_eq!(names(&manager), vec!["project_dot_venv"]);
        assert_eq!(manager.location_label(), "~ (scanned from home)");
        assert!(manager.status_line().starts_with("Scanned 1 environments from home."));

        // refresh goes back to the managed folder
        manager.reload().unwrap();
        assert_eq!(names(&manager), vec!["a"]);
    }

    #[test]
    fn test_refresh_scan_drops_vanished_environments() {
        let temp_dir = tempdir().unwrap();
        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();

        let root = PathBuf::from("/home/me");
        let report = ScanReport {
            environments: vec![Environment::new("project_dot_venv", "/home/me/site/.venv")]
                .into_iter()
                .collect(),
            inaccessible: 0,
        };
        assert!(manager.apply_scan(root.clone(), report));

        assert_eq!(manager.refresh_scan(root.clone(), ScanReport::default()), 0);
        assert!(manager.environments().is_empty());
        assert_eq!(manager.source(), &ListSource::HomeScan(root));
        assert!(manager.status_line().starts_with("Scanned 0 environments from home."));
    }

    #[test]
    fn test_record_created_keeps_paths_unique() {
        let temp_dir = tempdir().unwrap();
        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();

        let env = Environment::new("a", temp_dir.path().join("venv-a"));
        manager.record_created(env.clone());
        manager.record_created(env);
        assert_eq!(manager.environments().len(), 1);
    }

    #[test]
    fn test_prepare_create_uses_managed_folder() {
        let temp_dir = tempdir().unwrap();
        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();

        let request = manager.prepare_create("tools").unwrap();
        assert_eq!(request.path, temp_dir.path().join("venv-tools"));
        assert_eq!(request.python, manager.settings().python);
        assert!(matches!(manager.prepare_create(""), Err(VenvError::EmptyName)));
    }

    #[test]
    fn test_delete_removes_folder_and_record() {
        let temp_dir = tempdir().unwrap();
        let doomed = temp_dir.path().join("venv-old");
        fs::create_dir_all(doomed.join("lib")).unwrap();
        fs::create_dir_all(temp_dir.path().join("venv-keep")).unwrap();

        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();

        let removed = manager.delete(&doomed).unwrap();
        assert_eq!(removed.name, "old");
        assert!(!doomed.exists());
        assert_eq!(names(&manager), vec!["keep"]);
    }

    #[test]
    fn test_delete_refuses_unlisted_path() {
        let temp_dir = tempdir().unwrap();
        let outsider = temp_dir.path().join("important");
        fs::create_dir_all(&outsider).unwrap();

        let mut manager = manager_in(temp_dir.path());
        manager.initialize().unwrap();

        assert!(matches!(
            manager.delete(&outsider),
            Err(VenvError::NotListed { .. })
        ));
        assert!(outsider.exists());
        assert!(matches!(
            manager.activate(&outsider),
            Err(VenvError::NotListed { .. })
        ));
    }
}
