//! Subject domain model.
//!
//! # Invariants
//! - `name` is never blank.
//! - `id` is `None` until the store assigns one.

use crate::model::error::AppError;
use crate::model::validate::require_text;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Store-assigned subject identity.
pub type SubjectId = i64;

/// Academic subject that groups tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: Option<SubjectId>,
    pub name: String,
}

impl Subject {
    /// Creates an unsaved subject.
    ///
    /// # Errors
    /// - `AppError::EmptyField` when `name` is empty or whitespace-only.
    pub fn new(name: impl Into<String>) -> Result<Self, AppError> {
        let subject = Self {
            id: None,
            name: name.into(),
        };
        subject.validate()?;
        Ok(subject)
    }

    /// Creates a subject that already has a store identity.
    pub fn with_id(id: SubjectId, name: impl Into<String>) -> Result<Self, AppError> {
        let subject = Self {
            id: Some(id),
            name: name.into(),
        };
        subject.validate()?;
        Ok(subject)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
