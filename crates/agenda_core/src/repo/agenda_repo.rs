//! Subject/task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/query APIs over `subjects` and `tasks` storage.
//! - Translate storage-level uniqueness signals into `AppError::DuplicateEntry`.
//! - Map joined rows back into fully populated domain entities.
//!
//! # Invariants
//! - Write paths validate entities before SQL mutations.
//! - Subject name uniqueness is enforced by the `UNIQUE` constraint.
//! - Task (`name`, `subject_id`) uniqueness is checked and inserted inside one
//!   IMMEDIATE transaction.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Task listings are ordered by `due_date ASC, id ASC`.

use crate::db::DbError;
use crate::model::error::{AppError, DuplicateEntry};
use crate::model::subject::{Subject, SubjectId};
use crate::model::task::{Task, TaskId};
use crate::model::validate::{format_due_date, latest_due_date};
use crate::repo::schema::ensure_connection_ready;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Params, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    t.id AS task_id,
    t.name AS task_name,
    t.due_date AS due_date,
    t.description AS description,
    s.id AS subject_id,
    s.name AS subject_name
FROM tasks t
INNER JOIN subjects s ON s.id = t.subject_id";

const TASK_ORDER_SQL: &str = "ORDER BY t.due_date ASC, t.id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for subject/task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Domain validation or uniqueness failure.
    App(AppError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// A task referenced a subject the store does not know.
    SubjectNotFound(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl RepoError {
    /// Returns the domain error carried by this failure, if any.
    pub fn app_error(&self) -> Option<&AppError> {
        match self {
            Self::App(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.app_error().is_some_and(AppError::is_duplicate)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::App(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::SubjectNotFound(name) => write!(f, "subject not found: `{name}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "agenda repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "agenda repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "agenda repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted agenda data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::App(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AppError> for RepoError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for subjects and tasks.
pub trait AgendaRepository {
    /// Inserts a new subject and returns its assigned id.
    fn save_subject(&self, subject: &Subject) -> RepoResult<SubjectId>;
    /// Returns all subjects ordered by name.
    fn list_subjects(&self) -> RepoResult<Vec<Subject>>;
    /// Finds one subject by exact (case-sensitive) name.
    fn find_subject_by_name(&self, name: &str) -> RepoResult<Option<Subject>>;
    /// Inserts a new task under an existing subject and returns its id.
    fn save_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Returns all tasks ordered by due date.
    fn list_all_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Returns tasks due within `[start, end]`, ordered by due date.
    fn list_tasks_in_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed agenda repository.
pub struct SqliteAgendaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgendaRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Skips readiness checks for connections already verified by the caller.
    pub(crate) fn new_verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AgendaRepository for SqliteAgendaRepository<'_> {
    fn save_subject(&self, subject: &Subject) -> RepoResult<SubjectId> {
        subject.validate()?;

        if let Err(err) = self.conn.execute(
            "INSERT INTO subjects (name) VALUES (?1);",
            [subject.name.as_str()],
        ) {
            if is_unique_violation(&err) {
                warn!("event=subject_save module=repo status=rejected reason=duplicate");
                return Err(AppError::DuplicateEntry(DuplicateEntry::Subject {
                    name: subject.name.clone(),
                })
                .into());
            }
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        info!("event=subject_save module=repo status=ok subject_id={id}");
        Ok(id)
    }

    fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM subjects ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row, "id", "name")?);
        }
        Ok(subjects)
    }

    fn find_subject_by_name(&self, name: &str) -> RepoResult<Option<Subject>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM subjects WHERE name = ?1;")?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_subject_row(row, "id", "name")?)),
            None => Ok(None),
        }
    }

    fn save_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let subject_id = resolve_subject_id(&tx, &task.subject)?;

        let exists: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM tasks WHERE name = ?1 AND subject_id = ?2
            );",
            params![task.name.as_str(), subject_id],
            |row| row.get(0),
        )?;
        if exists == 1 {
            warn!(
                "event=task_save module=repo status=rejected reason=duplicate subject_id={subject_id}"
            );
            return Err(AppError::DuplicateEntry(DuplicateEntry::Task {
                name: task.name.clone(),
                subject_id,
            })
            .into());
        }

        tx.execute(
            "INSERT INTO tasks (name, due_date, description, subject_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.name.as_str(),
                format_due_date(task.due_date),
                task.description.as_str(),
                subject_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!("event=task_save module=repo status=ok task_id={id} subject_id={subject_id}");
        Ok(id)
    }

    fn list_all_tasks(&self) -> RepoResult<Vec<Task>> {
        let sql = format!("{TASK_SELECT_SQL} {TASK_ORDER_SQL};");
        let tasks = query_tasks(self.conn, &sql, params![])?;
        debug!(
            "event=task_query module=repo status=ok kind=all rows={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn list_tasks_in_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<Task>> {
        // Years past 9999 do not sort as text against stored dates.
        let latest = latest_due_date();
        if start > latest {
            return Ok(Vec::new());
        }
        let end = end.min(latest);

        let sql = format!("{TASK_SELECT_SQL} WHERE t.due_date BETWEEN ?1 AND ?2 {TASK_ORDER_SQL};");
        let tasks = query_tasks(
            self.conn,
            &sql,
            params![format_due_date(start), format_due_date(end)],
        )?;
        debug!(
            "event=task_query module=repo status=ok kind=range start={start} end={end} rows={}",
            tasks.len()
        );
        Ok(tasks)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Resolves the stored identity of the subject a task points at.
///
/// A set `id` must exist; an unset `id` is looked up by exact name.
fn resolve_subject_id(tx: &Transaction<'_>, subject: &Subject) -> RepoResult<SubjectId> {
    let found = match subject.id {
        Some(id) => tx
            .query_row("SELECT id FROM subjects WHERE id = ?1;", [id], |row| {
                row.get::<_, SubjectId>(0)
            })
            .optional()?,
        None => tx
            .query_row(
                "SELECT id FROM subjects WHERE name = ?1;",
                [subject.name.as_str()],
                |row| row.get::<_, SubjectId>(0),
            )
            .optional()?,
    };

    found.ok_or_else(|| RepoError::SubjectNotFound(subject.name.clone()))
}

fn query_tasks(conn: &Connection, sql: &str, params: impl Params) -> RepoResult<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn parse_subject_row(row: &Row<'_>, id_column: &str, name_column: &str) -> RepoResult<Subject> {
    let id: SubjectId = row.get(id_column)?;
    let name: String = row.get(name_column)?;
    Subject::with_id(id, name)
        .map_err(|err| RepoError::InvalidData(format!("subjects row {id}: {err}")))
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let subject = parse_subject_row(row, "subject_id", "subject_name")?;
    let id: TaskId = row.get("task_id")?;
    let name: String = row.get("task_name")?;
    let due_date: String = row.get("due_date")?;
    let description: Option<String> = row.get("description")?;

    Task::with_id(id, name, &due_date, subject, description.unwrap_or_default())
        .map_err(|err| RepoError::InvalidData(format!("tasks row {id}: {err}")))
}
