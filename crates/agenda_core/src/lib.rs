//! Core domain logic for the academic agenda.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AgendaConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::error::{AppError, DuplicateEntry};
pub use model::subject::{Subject, SubjectId};
pub use model::task::{Task, TaskId};
pub use model::validate::{format_due_date, parse_due_date};
pub use report::{render_reminder, Report, ReportPeriod};
pub use repo::agenda_repo::{AgendaRepository, RepoError, RepoResult, SqliteAgendaRepository};
pub use service::agenda_service::{filter_tasks, AgendaService, DEFAULT_REMINDER_DAYS};
pub use store::TaskStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
