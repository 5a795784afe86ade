//! Task domain model.
//!
//! # Responsibility
//! - Validate user-entered task fields before persistence is attempted.
//!
//! # Invariants
//! - `name` is never blank.
//! - `due_date` always came from a strict `YYYY-MM-DD` string.
//! - Blank-field checks run before date parsing.

use crate::model::error::AppError;
use crate::model::subject::Subject;
use crate::model::validate::{format_due_date, parse_due_date, require_text};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Store-assigned task identity.
pub type TaskId = i64;

/// Dated assignment that belongs to exactly one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: Option<TaskId>,
    pub name: String,
    /// Serialized as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    /// Free text, empty when the user gave none.
    pub description: String,
    pub subject: Subject,
}

impl Task {
    /// Creates an unsaved task from raw form input.
    ///
    /// # Errors
    /// - `AppError::EmptyField` when `name` or `due_date_text` is blank.
    /// - `AppError::InvalidDate` when `due_date_text` is not `YYYY-MM-DD`.
    pub fn new(
        name: impl Into<String>,
        due_date_text: &str,
        subject: Subject,
        description: impl Into<String>,
    ) -> Result<Self, AppError> {
        let name = name.into();
        require_text("name", &name)?;
        require_text("due_date", due_date_text)?;
        let due_date = parse_due_date(due_date_text)?;

        Ok(Self {
            id: None,
            name,
            due_date,
            description: description.into(),
            subject,
        })
    }

    /// Same as [`Task::new`] with an empty description.
    pub fn without_description(
        name: impl Into<String>,
        due_date_text: &str,
        subject: Subject,
    ) -> Result<Self, AppError> {
        Self::new(name, due_date_text, subject, String::new())
    }

    /// Rebuilds a persisted task; used by the store read path.
    pub fn with_id(
        id: TaskId,
        name: impl Into<String>,
        due_date_text: &str,
        subject: Subject,
        description: impl Into<String>,
    ) -> Result<Self, AppError> {
        let mut task = Self::new(name, due_date_text, subject, description)?;
        task.id = Some(id);
        Ok(task)
    }

    /// Re-checks invariants on a value whose public fields may have been edited.
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        self.subject.validate()
    }

    /// Due date in its canonical text form.
    pub fn due_date_text(&self) -> String {
        format_due_date(self.due_date)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "task `{}` of `{}` due {}",
            self.name,
            self.subject.name,
            self.due_date_text()
        )
    }
}
