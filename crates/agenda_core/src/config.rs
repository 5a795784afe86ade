//! Runtime configuration for agenda front ends.
//!
//! # Responsibility
//! - Resolve store path, logging and reminder settings.
//!
//! # Invariants
//! - Resolution order is defaults, then environment, then explicit overrides
//!   applied by the caller.
//! - Blank environment values are treated as unset.

use crate::logging::default_log_level;
use crate::service::agenda_service::DEFAULT_REMINDER_DAYS;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "agenda.sqlite3";

pub const ENV_DB_PATH: &str = "AGENDA_DB_PATH";
pub const ENV_LOG_DIR: &str = "AGENDA_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "AGENDA_LOG_LEVEL";
pub const ENV_REMINDER_DAYS: &str = "AGENDA_REMINDER_DAYS";

/// Configuration resolution error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Rolling log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    /// Reminder lookahead in days.
    pub reminder_days: u32,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level().to_string(),
            reminder_days: DEFAULT_REMINDER_DAYS,
        }
    }
}

impl AgendaConfig {
    /// Resolves defaults overlaid with process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(days) = get(ENV_REMINDER_DAYS) {
            config.reminder_days = days.parse::<u32>().map_err(|err| ConfigError::InvalidValue {
                key: ENV_REMINDER_DAYS,
                value: days.clone(),
                reason: err.to_string(),
            })?;
        }

        Ok(config)
    }
}
