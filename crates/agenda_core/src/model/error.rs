//! Application error taxonomy shared by model and repository layers.
//!
//! # Responsibility
//! - Describe every domain-level failure a caller may need to present.
//!
//! # Invariants
//! - Validation failures (`EmptyField`, `InvalidDate`) are raised before any
//!   storage interaction.
//! - `DuplicateEntry` is only raised by the store, which is the sole
//!   authority for uniqueness.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Uniqueness invariant that a save attempt violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateEntry {
    /// A subject with the same name already exists.
    Subject { name: String },
    /// A task with the same name already exists under the same subject.
    Task { name: String, subject_id: i64 },
}

/// Base application error.
///
/// Callers can match on the enum as a whole, or on a single variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A required text field was blank.
    EmptyField { field: &'static str },
    /// A date string failed to parse as `YYYY-MM-DD`.
    InvalidDate { value: String },
    /// A uniqueness invariant was violated.
    DuplicateEntry(DuplicateEntry),
}

impl AppError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateEntry(_))
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "field `{field}` cannot be empty"),
            Self::InvalidDate { value } => {
                write!(f, "invalid date `{value}`; expected format YYYY-MM-DD")
            }
            Self::DuplicateEntry(DuplicateEntry::Subject { name }) => {
                write!(f, "subject `{name}` already exists")
            }
            Self::DuplicateEntry(DuplicateEntry::Task { name, .. }) => {
                write!(f, "task `{name}` already exists for this subject")
            }
        }
    }
}

impl Error for AppError {}
