//! Core library surface for the Student Roster TUI application.
//!
//! The `bin` target wires these pieces together; tests and other tooling can
//! use the repository directly without a terminal.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// The repository over the embedded SQLite store.
pub use db::StudentRepository;

pub use config::{AppConfig, BootstrapMode};
pub use error::{ConfigError, StoreError};
pub use models::{StudentName, StudentRecord};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
