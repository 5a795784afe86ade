//! Agenda use-case service.
//!
//! # Responsibility
//! - Turn raw user input into validated entities and persist them.
//! - Provide keyword search, upcoming-task reminders and period reports.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Search and reminders never mutate storage.

use crate::model::error::AppError;
use crate::model::subject::Subject;
use crate::model::task::Task;
use crate::report::{Report, ReportPeriod};
use crate::repo::agenda_repo::{AgendaRepository, RepoResult};
use chrono::{Days, NaiveDate};

/// Default reminder lookahead in days.
pub const DEFAULT_REMINDER_DAYS: u32 = 7;

/// Use-case facade over repository implementations.
pub struct AgendaService<R: AgendaRepository> {
    repo: R,
}

impl<R: AgendaRepository> AgendaService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the wrapped repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the wrapped repository, e.g. to close a store.
    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Registers a new subject and returns it with its assigned id.
    pub fn add_subject(&self, name: impl Into<String>) -> RepoResult<Subject> {
        let mut subject = Subject::new(name)?;
        subject.id = Some(self.repo.save_subject(&subject)?);
        Ok(subject)
    }

    /// Adds a task under the subject named `subject_name`.
    ///
    /// # Errors
    /// - `AppError::EmptyField { field: "subject" }` when no existing subject
    ///   matches `subject_name`.
    /// - Task construction and duplicate errors unchanged.
    pub fn add_task(
        &self,
        name: impl Into<String>,
        due_date_text: &str,
        subject_name: &str,
        description: impl Into<String>,
    ) -> RepoResult<Task> {
        let subject = self
            .repo
            .find_subject_by_name(subject_name)?
            .ok_or(AppError::EmptyField { field: "subject" })?;

        let mut task = Task::new(name, due_date_text, subject, description)?;
        task.id = Some(self.repo.save_task(&task)?);
        Ok(task)
    }

    pub fn subjects(&self) -> RepoResult<Vec<Subject>> {
        self.repo.list_subjects()
    }

    pub fn all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_all_tasks()
    }

    /// Lists tasks whose name or subject name contains `keyword`,
    /// ignoring case. A blank keyword matches everything.
    pub fn search(&self, keyword: &str) -> RepoResult<Vec<Task>> {
        Ok(filter_tasks(self.repo.list_all_tasks()?, keyword))
    }

    /// Lists tasks due between `today` and `today + days`, both inclusive.
    ///
    /// A lookahead past the last representable date is clamped to it.
    pub fn upcoming(&self, today: NaiveDate, days: u32) -> RepoResult<Vec<Task>> {
        let end = lookahead_end(today, days);
        self.repo.list_tasks_in_range(today, end)
    }

    /// Builds the report for `period` around `today`.
    pub fn report(&self, period: ReportPeriod, today: NaiveDate) -> RepoResult<Report> {
        let (start, end) = period.bounds(today);
        let tasks = self.repo.list_tasks_in_range(start, end)?;
        Ok(Report::new(period, today, tasks))
    }
}

fn lookahead_end(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Keeps tasks whose name or subject name contains `keyword`, ignoring case.
pub fn filter_tasks(tasks: Vec<Task>, keyword: &str) -> Vec<Task> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return tasks;
    }

    tasks
        .into_iter()
        .filter(|task| {
            task.name.to_lowercase().contains(&keyword)
                || task.subject.name.to_lowercase().contains(&keyword)
        })
        .collect()
}
