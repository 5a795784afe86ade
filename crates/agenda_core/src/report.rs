//! Report periods and plain-text rendering.
//!
//! # Responsibility
//! - Compute week/month boundaries around a reference day.
//! - Render range-query output as fixed-layout report text.
//!
//! # Invariants
//! - Weeks run Monday through Sunday.
//! - Period bounds are inclusive on both ends.

use crate::model::task::Task;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

const SUBJECT_COLUMN_WIDTH: usize = 15;
const EMPTY_REPORT_TEXT: &str = "No tasks scheduled for this period.";

/// Reporting window relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// Monday..Sunday of the reference day's week.
    Week,
    /// First..last day of the reference day's month.
    Month,
}

impl ReportPeriod {
    /// Returns the inclusive `(start, end)` bounds containing `today`.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Week => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                let start = today - Days::new(offset);
                (start, start + Days::new(6))
            }
            Self::Month => {
                let start = today - Days::new(u64::from(today.day0()));
                let end = start + Months::new(1) - Days::new(1);
                (start, end)
            }
        }
    }

    fn title(self, today: NaiveDate, start: NaiveDate, end: NaiveDate) -> String {
        match self {
            Self::Week => format!("Weekly report ({start} to {end})"),
            Self::Month => format!("Monthly report ({})", today.format("%B %Y")),
        }
    }
}

/// Tasks due within one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub period: ReportPeriod,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Ordered by due date.
    pub tasks: Vec<Task>,
}

impl Report {
    /// Builds a report for `period` around `today` from already-queried tasks.
    pub fn new(period: ReportPeriod, today: NaiveDate, tasks: Vec<Task>) -> Self {
        let (start, end) = period.bounds(today);
        Self {
            period,
            title: period.title(today, start, end),
            start,
            end,
            tasks,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("--- {} ---\n\n", self.title);
        if self.tasks.is_empty() {
            out.push_str(EMPTY_REPORT_TEXT);
            return out;
        }
        for task in &self.tasks {
            out.push_str(&format!(
                "{} - [{:<width$}] - {}\n",
                task.due_date_text(),
                task.subject.name.to_uppercase(),
                task.name,
                width = SUBJECT_COLUMN_WIDTH
            ));
        }
        out
    }
}

/// Renders the startup reminder, or `None` when nothing is due.
pub fn render_reminder(tasks: &[Task], days: u32) -> Option<String> {
    if tasks.is_empty() {
        return None;
    }

    let mut out = format!("Tasks due in the next {days} days:\n\n");
    let lines = tasks
        .iter()
        .map(|task| {
            format!(
                "- {} ({}) due {}",
                task.name,
                task.subject.name,
                task.due_date_text()
            )
        })
        .collect::<Vec<_>>();
    out.push_str(&lines.join("\n"));
    Some(out)
}
