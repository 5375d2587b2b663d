use iced::widget::{button, column, container, row, scrollable, space, text, text_input, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use std::path::PathBuf;
use tracing::{error, info, warn};
use venv_rs_config::{ManagerSettings, ScanSettings};
use venv_rs_core::{
    create_environment, scan_for_environments, Environment, ListSource, ScanReport, VenvManager,
};
use venv_rs_ui::{colors, styles};

use crate::dialogs;

const NO_SELECTION: &str = "Please select a virtual environment.";

pub struct VenvManagerApp {
    manager: VenvManager,
    settings_path: PathBuf,
    new_name: String,
    selected: Option<PathBuf>,
    status: String,
    busy: Option<Busy>,
}

/// Long-running work in flight; list-changing controls are disabled meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Creating,
    Scanning,
}

/// Why a home scan was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// The scan button; an empty result keeps the current listing.
    Search,
    /// Refresh of a scanned listing; the result always replaces it.
    Refresh,
}

#[derive(Debug, Clone)]
pub enum Message {
    NameChanged(String),
    Create,
    Created(Result<Environment, String>),
    ChangeFolder,
    FolderPicked(Option<PathBuf>),
    ScanHome,
    ScanFinished(ScanKind, Result<(PathBuf, ScanReport), String>),
    Select(PathBuf),
    Activate,
    Delete,
    DeleteConfirmed(PathBuf, bool),
    Refresh,
    DialogClosed,
}

impl VenvManagerApp {
    pub fn new() -> (Self, Task<Message>) {
        Self::with_settings(ManagerSettings::load(), ManagerSettings::config_path())
    }

    /// Start with `settings`; folder changes are written back to `settings_path`.
    pub fn with_settings(settings: ManagerSettings, settings_path: PathBuf) -> (Self, Task<Message>) {
        let mut manager = VenvManager::new(settings);
        let startup = match manager.initialize() {
            Ok(count) => {
                info!("Loaded {} environments from {:?}", count, manager.venv_dir());
                Task::none()
            }
            Err(e) => {
                error!("Could not open {:?}: {}", manager.venv_dir(), e);
                show_error(e.to_string())
            }
        };

        let status = manager.status_line();
        (
            Self {
                manager,
                settings_path,
                new_name: String::new(),
                selected: None,
                status,
                busy: None,
            },
            startup,
        )
    }

    pub fn title(&self) -> String {
        String::from("Python Virtual Environment Manager")
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn style(&self, theme: &Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: colors::GLASS_BASE,
            text_color: theme.palette().text,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NameChanged(name) => {
                self.new_name = name;
                Task::none()
            }
            Message::Create => {
                if self.busy.is_some() {
                    return Task::none();
                }
                match self.manager.prepare_create(&self.new_name) {
                    Ok(request) => {
                        self.busy = Some(Busy::Creating);
                        self.status = format!("Creating '{}'...", request.name);
                        Task::perform(create_environment(request), |result| {
                            Message::Created(result.map_err(|e| e.to_string()))
                        })
                    }
                    Err(e) => show_error(e.to_string()),
                }
            }
            Message::Created(result) => {
                self.busy = None;
                match result {
                    Ok(env) => {
                        let text = format!(
                            "Created virtual environment '{}' at {}",
                            env.name,
                            env.path.display()
                        );
                        self.manager.record_created(env);
                        self.new_name.clear();
                        self.status = self.manager.status_line();
                        show_info("Success", text)
                    }
                    Err(e) => {
                        self.status = self.manager.status_line();
                        show_error(e)
                    }
                }
            }
            Message::ChangeFolder => Task::perform(
                dialogs::pick_folder(self.manager.venv_dir().to_path_buf()),
                Message::FolderPicked,
            ),
            Message::FolderPicked(None) => Task::none(),
            Message::FolderPicked(Some(dir)) => match self.manager.change_dir(&dir) {
                Ok(_) => {
                    if let Err(e) = self.manager.settings().save_to(&self.settings_path) {
                        warn!("Could not save settings to {:?}: {}", self.settings_path, e);
                    }
                    self.selected = None;
                    self.status = self.manager.status_line();
                    Task::none()
                }
                Err(e) => show_error(e.to_string()),
            },
            Message::ScanHome => self.start_scan(ScanKind::Search),
            Message::ScanFinished(_, Err(e)) => {
                self.busy = None;
                self.status = self.manager.status_line();
                show_error(format!("Scan failed: {}", e))
            }
            Message::ScanFinished(kind, Ok((root, report))) => {
                self.busy = None;
                let found = report.found();
                let inaccessible = report.inaccessible;

                let warning = if inaccessible > 0 {
                    Task::perform(
                        dialogs::warning(
                            "Scan Warning".to_string(),
                            "Some directories could not be accessed due to permissions.".to_string(),
                        ),
                        |_| Message::DialogClosed,
                    )
                } else {
                    Task::none()
                };

                if kind == ScanKind::Refresh {
                    self.manager.refresh_scan(root, report);
                    self.retain_selection();
                    self.status = self.manager.status_line();
                    return warning;
                }

                let summary = if self.manager.apply_scan(root, report) {
                    self.selected = None;
                    self.status = self.manager.status_line();
                    format!("Found {} virtual environments in your home directory.", found)
                } else {
                    self.status = self.manager.status_line();
                    "No virtual environments found in your home directory.".to_string()
                };

                warning.chain(show_info("Scan Complete", summary))
            }
            Message::Select(path) => {
                self.selected = Some(path);
                Task::none()
            }
            Message::Activate => {
                let Some(path) = self.selected.clone() else {
                    return show_warning(NO_SELECTION);
                };
                match self.manager.activate(&path) {
                    Ok(env) => {
                        self.status = format!("Opened Terminal with '{}' activated.", env.folder_name());
                        Task::none()
                    }
                    Err(e) => show_error(e.to_string()),
                }
            }
            Message::Delete => {
                let Some(env) = self
                    .selected
                    .as_deref()
                    .and_then(|path| self.manager.environments().find_by_path(path))
                    .cloned()
                else {
                    return show_warning(NO_SELECTION);
                };

                let question = format!(
                    "Delete '{}' at {}? This cannot be undone.",
                    env.folder_name(),
                    env.path.display()
                );
                Task::perform(
                    dialogs::confirm("Confirm".to_string(), question),
                    move |yes| Message::DeleteConfirmed(env.path.clone(), yes),
                )
            }
            Message::DeleteConfirmed(_, false) => Task::none(),
            Message::DeleteConfirmed(path, true) => match self.manager.delete(&path) {
                Ok(env) => {
                    if self.selected.as_deref() == Some(path.as_path()) {
                        self.selected = None;
                    }
                    self.status = self.manager.status_line();
                    show_info("Success", format!("Deleted '{}'.", env.folder_name()))
                }
                Err(e) => show_error(e.to_string()),
            },
            Message::Refresh => match self.manager.source() {
                ListSource::HomeScan(_) => self.start_scan(ScanKind::Refresh),
                ListSource::Directory(_) => match self.manager.reload() {
                    Ok(_) => {
                        self.retain_selection();
                        self.status = self.manager.status_line();
                        Task::none()
                    }
                    Err(e) => show_error(e.to_string()),
                },
            },
            Message::DialogClosed => Task::none(),
        }
    }

    fn start_scan(&mut self, kind: ScanKind) -> Task<Message> {
        if self.busy.is_some() {
            return Task::none();
        }
        let root = match self.manager.scan_root() {
            Ok(root) => root,
            Err(e) => return show_error(e.to_string()),
        };

        self.busy = Some(Busy::Scanning);
        self.status = format!("Scanning {} for virtual environments...", root.display());
        Task::perform(
            scan_in_background(root, self.manager.scan_settings().clone()),
            move |result| Message::ScanFinished(kind, result),
        )
    }

    fn retain_selection(&mut self) {
        let still_listed = self
            .selected
            .as_deref()
            .is_some_and(|path| self.manager.environments().contains_path(path));
        if !still_listed {
            self.selected = None;
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let idle = self.busy.is_none();

        let controls = row![
            text("New Environment Name:").size(14).color(colors::TEXT_SECONDARY),
            text_input("name", &self.new_name)
                .on_input(Message::NameChanged)
                .on_submit(Message::Create)
                .padding(8)
                .width(Length::Fill)
                .style(styles::name_input),
            button(text("Create").size(14))
                .on_press_maybe(idle.then_some(Message::Create))
                .padding([8, 14])
                .style(styles::action_button),
            button(text("Change Venv Folder").size(14))
                .on_press_maybe(idle.then_some(Message::ChangeFolder))
                .padding([8, 14])
                .style(styles::action_button),
            button(text("Scan User Home for Venvs").size(14))
                .on_press_maybe(idle.then_some(Message::ScanHome))
                .padding([8, 14])
                .style(styles::action_button),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let location = text(self.manager.location_label())
            .size(13)
            .color(colors::TEXT_SECONDARY);

        let actions = row![
            button(text("Activate in Terminal").size(14))
                .on_press(Message::Activate)
                .padding([8, 14])
                .style(styles::action_button),
            button(text("Delete").size(14))
                .on_press_maybe(idle.then_some(Message::Delete))
                .padding([8, 14])
                .style(styles::danger_button),
            space().width(Length::Fill),
            button(text("Refresh").size(14))
                .on_press_maybe(idle.then_some(Message::Refresh))
                .padding([8, 14])
                .style(styles::action_button),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let list_section = container(
            column![
                text("Virtual Environments").size(18).color(colors::TEXT_PRIMARY),
                self.view_list(),
                actions,
                text(self.status.as_str()).size(13).color(colors::TEXT_SECONDARY),
            ]
            .spacing(12),
        )
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(styles::section);

        container(column![controls, location, list_section].spacing(12).padding(20))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(styles::glass_base)
            .into()
    }

    fn view_list(&self) -> Element<'_, Message> {
        let environments = self.manager.environments();
        if environments.is_empty() {
            return container(
                text("No virtual environments listed.")
                    .size(14)
                    .color(colors::TEXT_SECONDARY),
            )
            .height(Length::Fill)
            .into();
        }

        let rows = environments.iter().map(|env| {
            let selected = self.selected.as_deref() == Some(env.path.as_path());
            let item: Element<'_, Message> = button(text(env.label()).size(14))
                .width(Length::Fill)
                .padding([6, 10])
                .on_press(Message::Select(env.path.clone()))
                .style(move |theme, status| styles::list_item(theme, status, selected))
                .into();
            item
        });

        scrollable(Column::with_children(rows).spacing(4))
            .height(Length::Fill)
            .into()
    }
}

async fn scan_in_background(
    root: PathBuf,
    settings: ScanSettings,
) -> Result<(PathBuf, ScanReport), String> {
    let walk_root = root.clone();
    tokio::task::spawn_blocking(move || scan_for_environments(&walk_root, &settings))
        .await
        .map(|report| (root, report))
        .map_err(|e| e.to_string())
}

fn show_error(description: impl Into<String>) -> Task<Message> {
    Task::perform(
        dialogs::error("Error".to_string(), description.into()),
        |_| Message::DialogClosed,
    )
}

fn show_warning(description: impl Into<String>) -> Task<Message> {
    Task::perform(
        dialogs::warning("Warning".to_string(), description.into()),
        |_| Message::DialogClosed,
    )
}

fn show_info(title: &str, description: impl Into<String>) -> Task<Message> {
    Task::perform(
        dialogs::info(title.to_string(), description.into()),
        |_| Message::DialogClosed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn app_in(dir: &Path) -> VenvManagerApp {
        let settings = ManagerSettings {
            venv_dir: dir.to_path_buf(),
            ..ManagerSettings::default()
        };
        VenvManagerApp::with_settings(settings, dir.join("settings").join("manager.toml")).0
    }

    fn scanned(paths: &[&str]) -> ScanReport {
        ScanReport {
            environments: paths
                .iter()
                .map(|path| Environment::from_discovered_dir(Path::new(path)))
                .collect(),
            inaccessible: 0,
        }
    }

    #[test]
    fn test_startup_lists_managed_folder() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("venv-web")).unwrap();

        let app = app_in(temp_dir.path());
        assert_eq!(app.manager.environments().len(), 1);
        assert_eq!(
            app.status,
            format!("Loaded 1 environments from {}.", temp_dir.path().display())
        );
    }

    #[test]
    fn test_folder_change_clears_selection() {
        let temp_dir = tempdir().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir_all(first.join("venv-a")).unwrap();
        fs::create_dir_all(second.join("venv-b")).unwrap();
        fs::create_dir_all(second.join("venv-c")).unwrap();

        let mut app = app_in(&first);
        let _ = app.update(Message::Select(first.join("venv-a")));
        let _ = app.update(Message::FolderPicked(Some(second.clone())));

        assert!(app.selected.is_none());
        assert_eq!(app.manager.environments().len(), 2);
        assert_eq!(app.manager.location_label(), second.display().to_string());

        let saved = ManagerSettings::load_from(&app.settings_path).unwrap();
        assert_eq!(saved.venv_dir, second);
    }

    #[test]
    fn test_create_marks_busy_until_result() {
        let temp_dir = tempdir().unwrap();
        let mut app = app_in(temp_dir.path());

        let _ = app.update(Message::NameChanged("tools".to_string()));
        let _ = app.update(Message::Create);
        assert_eq!(app.busy, Some(Busy::Creating));

        let env = Environment::new("tools", temp_dir.path().join("venv-tools"));
        let _ = app.update(Message::Created(Ok(env)));
        assert!(app.busy.is_none());
        assert!(app.new_name.is_empty());
        assert_eq!(app.manager.environments().len(), 1);
    }

    #[test]
    fn test_invalid_name_does_not_start_creation() {
        let temp_dir = tempdir().unwrap();
        let mut app = app_in(temp_dir.path());

        let _ = app.update(Message::NameChanged("   ".to_string()));
        let _ = app.update(Message::Create);
        assert!(app.busy.is_none());
    }

    #[test]
    fn test_confirmed_delete_removes_selected() {
        let temp_dir = tempdir().unwrap();
        let doomed = temp_dir.path().join("venv-old");
        fs::create_dir(&doomed).unwrap();

        let mut app = app_in(temp_dir.path());
        let _ = app.update(Message::Select(doomed.clone()));
        let _ = app.update(Message::DeleteConfirmed(doomed.clone(), false));
        assert!(doomed.exists());

        let _ = app.update(Message::DeleteConfirmed(doomed.clone(), true));
        assert!(!doomed.exists());
        assert!(app.selected.is_none());
        assert!(app.manager.environments().is_empty());
    }

    #[test]
    fn test_scan_result_replaces_listing() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("venv-a")).unwrap();
        let mut app = app_in(temp_dir.path());
        app.busy = Some(Busy::Scanning);

        let report = ScanReport {
            environments: vec![
                Environment::new("project_dot_venv", "/home/me/site/.venv"),
                Environment::new("ml", "/home/me/venvs/venv-ml"),
            ]
            .into_iter()
            .collect(),
            inaccessible: 0,
        };
        let _ = app.update(Message::ScanFinished(
            ScanKind::Search,
            Ok((PathBuf::from("/home/me"), report)),
        ));

        assert!(app.busy.is_none());
        assert_eq!(app.manager.environments().len(), 2);
        assert_eq!(app.manager.location_label(), "~ (scanned from home)");
    }

    #[test]
    fn test_empty_search_keeps_listing() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("venv-a")).unwrap();
        let mut app = app_in(temp_dir.path());

        let _ = app.update(Message::ScanFinished(
            ScanKind::Search,
            Ok((PathBuf::from("/home/me"), ScanReport::default())),
        ));
        assert_eq!(app.manager.environments().len(), 1);
        assert_eq!(
            app.manager.source(),
            &ListSource::Directory(temp_dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_refresh_of_scanned_listing_rescans() {
        let temp_dir = tempdir().unwrap();
        let mut app = app_in(temp_dir.path());
        let root = PathBuf::from("/home/me");

        let _ = app.update(Message::ScanFinished(
            ScanKind::Search,
            Ok((root.clone(), scanned(&["/home/me/site/.venv", "/home/me/venvs/venv-ml"]))),
        ));
        let _ = app.update(Message::Select(PathBuf::from("/home/me/site/.venv")));
        assert_eq!(app.manager.environments().len(), 2);

        let _ = app.update(Message::Refresh);
        assert_eq!(app.busy, Some(Busy::Scanning));

        let _ = app.update(Message::ScanFinished(
            ScanKind::Refresh,
            Ok((root.clone(), scanned(&["/home/me/venvs/venv-ml"]))),
        ));
        assert!(app.busy.is_none());
        assert_eq!(app.manager.environments().len(), 1);
        assert!(app.selected.is_none());

        // the last environment was removed outside the app
        let _ = app.update(Message::ScanFinished(ScanKind::Refresh, Ok((root.clone(), scanned(&[])))));
        assert!(app.manager.environments().is_empty());
        assert_eq!(app.manager.source(), &ListSource::HomeScan(root));
    }
}
