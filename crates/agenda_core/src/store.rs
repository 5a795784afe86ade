//! Connection-owning task store.
//!
//! # Responsibility
//! - Hold the single SQLite connection used for the whole store lifetime.
//! - Expose the subject/task data-access operations to callers.
//!
//! # Invariants
//! - The connection is migrated and verified before the store is returned.
//! - `close` consumes the store, so it can run at most once.
//! - The store is `Send` but not `Sync`; hosts serialize access.

use crate::db::{open_db, open_db_in_memory};
use crate::model::subject::{Subject, SubjectId};
use crate::model::task::{Task, TaskId};
use crate::repo::agenda_repo::{AgendaRepository, RepoResult, SqliteAgendaRepository};
use crate::repo::schema::ensure_connection_ready;
use chrono::NaiveDate;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;

/// Durable storage for subjects and tasks.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Opens (creating if needed) a store backed by the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases the underlying connection.
    pub fn close(self) -> RepoResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=store_close module=store status=error error={err}");
                Err(err.into())
            }
        }
    }

    fn repo(&self) -> SqliteAgendaRepository<'_> {
        SqliteAgendaRepository::new_verified(&self.conn)
    }
}

impl AgendaRepository for TaskStore {
    fn save_subject(&self, subject: &Subject) -> RepoResult<SubjectId> {
        self.repo().save_subject(subject)
    }

    fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        self.repo().list_subjects()
    }

    fn find_subject_by_name(&self, name: &str) -> RepoResult<Option<Subject>> {
        self.repo().find_subject_by_name(name)
    }

    fn save_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.repo().save_task(task)
    }

    fn list_all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo().list_all_tasks()
    }

    fn list_tasks_in_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<Task>> {
        self.repo().list_tasks_in_range(start, end)
    }
}
