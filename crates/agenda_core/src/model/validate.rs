//! Field validation shared by every dated agenda entry.
//!
//! # Invariants
//! - Blank means empty or whitespace-only.
//! - Due dates are strict `YYYY-MM-DD`: four-digit year, two-digit month and
//!   day, and a real calendar date.

use crate::model::error::AppError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Storage and exchange format for due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

static DUE_DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));

/// Rejects blank values for the named field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::EmptyField { field });
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` due date.
///
/// Callers check for blank input first, so an empty string here is reported
/// as `InvalidDate` rather than `EmptyField`.
pub fn parse_due_date(text: &str) -> Result<NaiveDate, AppError> {
    let invalid = || AppError::InvalidDate {
        value: text.to_string(),
    };

    if !DUE_DATE_SHAPE_RE.is_match(text) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(text, DUE_DATE_FORMAT).map_err(|_| invalid())
}

/// Latest date expressible in the four-digit-year storage format.
pub fn latest_due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Formats a due date in its canonical text form.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}
