//! Listing, discovery and lifecycle of Python virtual environments.
//!
//! [`VenvManager`] owns the one record collection the application shows. The
//! free functions in [`discovery`] and [`lifecycle`] do the filesystem and
//! process work and can run away from the thread that owns the manager.

pub mod collection;
pub mod discovery;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod terminal;

pub use collection::EnvironmentList;
pub use discovery::{load_from_dir, scan_for_environments, ScanReport};
pub use environment::Environment;
pub use error::VenvError;
pub use lifecycle::{create_environment, delete_environment, CreateRequest};
pub use manager::{ListSource, VenvManager};
pub use terminal::{ActivationCommand, Platform};

pub use venv_rs_config::{ManagerSettings, ScanSettings, TerminalSettings};
