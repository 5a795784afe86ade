use agenda_core::db::migrations::latest_version;
use agenda_core::{
    AgendaRepository, AppError, DuplicateEntry, RepoError, SqliteAgendaRepository, Subject, Task,
    TaskStore,
};
use chrono::NaiveDate;
use rusqlite::Connection;

fn day(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

fn saved_subject(store: &TaskStore, name: &str) -> Subject {
    let mut subject = Subject::new(name).unwrap();
    subject.id = Some(store.save_subject(&subject).unwrap());
    subject
}

fn save_task(store: &TaskStore, name: &str, due: &str, subject: &Subject) -> i64 {
    let task = Task::without_description(name, due, subject.clone()).unwrap();
    store.save_task(&task).unwrap()
}

#[test]
fn save_subject_returns_positive_id_and_rejects_duplicates() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = Subject::new("Programming").unwrap();

    let id = store.save_subject(&subject).unwrap();
    assert!(id > 0);

    let err = store.save_subject(&subject).unwrap_err();
    assert!(err.is_duplicate());
    assert!(matches!(
        err,
        RepoError::App(AppError::DuplicateEntry(DuplicateEntry::Subject { ref name }))
            if name == "Programming"
    ));
}

#[test]
fn subject_names_are_case_sensitive() {
    let store = TaskStore::open_in_memory().unwrap();
    store
        .save_subject(&Subject::new("programming").unwrap())
        .unwrap();
    store
        .save_subject(&Subject::new("Programming").unwrap())
        .unwrap();

    assert_eq!(store.list_subjects().unwrap().len(), 2);
}

#[test]
fn list_subjects_is_ordered_by_name() {
    let store = TaskStore::open_in_memory().unwrap();
    for name in ["Physics", "Algebra", "Databases"] {
        saved_subject(&store, name);
    }

    let names: Vec<String> = store
        .list_subjects()
        .unwrap()
        .into_iter()
        .map(|subject| subject.name)
        .collect();
    assert_eq!(names, ["Algebra", "Databases", "Physics"]);
}

#[test]
fn find_subject_by_name_is_exact() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");

    assert_eq!(
        store.find_subject_by_name("Programming").unwrap(),
        Some(subject)
    );
    assert_eq!(store.find_subject_by_name("programming").unwrap(), None);
}

#[test]
fn same_task_name_under_same_subject_is_duplicate() {
    let store = TaskStore::open_in_memory().unwrap();
    let programming = saved_subject(&store, "Programming");
    let databases = saved_subject(&store, "Databases");

    let first = save_task(&store, "API REST", "2025-06-20", &programming);
    let other = save_task(&store, "API REST", "2025-06-21", &databases);
    assert_ne!(first, other);

    let again = Task::without_description("API REST", "2025-07-01", programming.clone()).unwrap();
    let err = store.save_task(&again).unwrap_err();
    assert!(matches!(
        err,
        RepoError::App(AppError::DuplicateEntry(DuplicateEntry::Task { subject_id, .. }))
            if Some(subject_id) == programming.id
    ));
    assert_eq!(store.list_all_tasks().unwrap().len(), 2);
}

#[test]
fn save_task_resolves_unsaved_subject_by_name() {
    let store = TaskStore::open_in_memory().unwrap();
    let saved = saved_subject(&store, "Programming");

    let unsaved = Subject::new("Programming").unwrap();
    let task = Task::without_description("API REST", "2025-06-20", unsaved).unwrap();
    store.save_task(&task).unwrap();

    let tasks = store.list_all_tasks().unwrap();
    assert_eq!(tasks[0].subject, saved);
}

#[test]
fn save_task_rejects_unknown_subject() {
    let store = TaskStore::open_in_memory().unwrap();

    let by_name = Task::without_description(
        "API REST",
        "2025-06-20",
        Subject::new("Ghost").unwrap(),
    )
    .unwrap();
    assert!(matches!(
        store.save_task(&by_name),
        Err(RepoError::SubjectNotFound(ref name)) if name == "Ghost"
    ));

    let by_id = Task::without_description(
        "API REST",
        "2025-06-20",
        Subject::with_id(99, "Ghost").unwrap(),
    )
    .unwrap();
    assert!(matches!(
        store.save_task(&by_id),
        Err(RepoError::SubjectNotFound(_))
    ));
    assert!(store.list_all_tasks().unwrap().is_empty());
}

#[test]
fn save_task_revalidates_edited_fields() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");

    let mut task = Task::without_description("API REST", "2025-06-20", subject).unwrap();
    task.name = "  ".to_string();
    assert!(matches!(
        store.save_task(&task),
        Err(RepoError::App(AppError::EmptyField { field: "name" }))
    ));
}

#[test]
fn list_all_tasks_is_sorted_by_due_date() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");

    save_task(&store, "C", "2025-07-01", &subject);
    save_task(&store, "A", "2025-01-15", &subject);
    save_task(&store, "D", "2025-12-31", &subject);
    save_task(&store, "B", "2025-06-20", &subject);

    let tasks = store.list_all_tasks().unwrap();
    let names: Vec<&str> = tasks.iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C", "D"]);
    assert!(tasks.windows(2).all(|pair| pair[0].due_date <= pair[1].due_date));
    assert!(tasks.iter().all(|task| task.id.is_some()));
}

#[test]
fn range_query_is_inclusive_on_both_ends() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");

    save_task(&store, "before", "2025-06-13", &subject);
    save_task(&store, "start", "2025-06-14", &subject);
    save_task(&store, "middle", "2025-06-17", &subject);
    save_task(&store, "end", "2025-06-20", &subject);
    save_task(&store, "after", "2025-06-21", &subject);

    let tasks = store
        .list_tasks_in_range(day("2025-06-14"), day("2025-06-20"))
        .unwrap();
    let names: Vec<&str> = tasks.iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names, ["start", "middle", "end"]);
}

#[test]
fn reversed_range_is_empty() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");
    save_task(&store, "API REST", "2025-06-20", &subject);

    let tasks = store
        .list_tasks_in_range(day("2025-06-30"), day("2025-06-01"))
        .unwrap();
    assert!(tasks.is_empty());
}

#[test]
fn range_past_four_digit_years_is_clamped() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");
    save_task(&store, "API REST", "2025-06-20", &subject);
    save_task(&store, "last day", "9999-12-31", &subject);

    let tasks = store
        .list_tasks_in_range(day("2025-06-14"), NaiveDate::MAX)
        .unwrap();
    let names: Vec<&str> = tasks.iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names, ["API REST", "last day"]);

    let beyond = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    assert!(store
        .list_tasks_in_range(beyond, NaiveDate::MAX)
        .unwrap()
        .is_empty());
}

#[test]
fn end_to_end_programming_scenario() {
    let store = TaskStore::open_in_memory().unwrap();

    let programming_id = store
        .save_subject(&Subject::new("Programming").unwrap())
        .unwrap();
    assert_eq!(programming_id, 1);
    let programming = Subject::with_id(programming_id, "Programming").unwrap();

    let task = Task::without_description("API REST", "2025-06-20", programming.clone()).unwrap();
    let task_id = store.save_task(&task).unwrap();
    assert_eq!(task_id, 1);

    let week = store
        .list_tasks_in_range(day("2025-06-14"), day("2025-06-20"))
        .unwrap();
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].name, "API REST");
    assert_eq!(week[0].subject.name, "Programming");
    assert_eq!(week[0].id, Some(1));

    let later = store
        .list_tasks_in_range(day("2025-06-21"), day("2025-06-30"))
        .unwrap();
    assert!(later.is_empty());

    assert!(store.save_task(&task).unwrap_err().is_duplicate());

    let databases_id = store
        .save_subject(&Subject::new("Databases").unwrap())
        .unwrap();
    assert_eq!(databases_id, 2);
    let databases = Subject::with_id(databases_id, "Databases").unwrap();
    let second = Task::without_description("API REST", "2025-06-20", databases).unwrap();
    let second_id = store.save_task(&second).unwrap();
    assert_ne!(second_id, task_id);

    store.close().unwrap();
}

#[test]
fn file_store_survives_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.sqlite3");

    let store = TaskStore::open(&path).unwrap();
    let subject = saved_subject(&store, "Programming");
    let task = Task::new("API REST", "2025-06-20", subject, "endpoints").unwrap();
    store.save_task(&task).unwrap();
    store.close().unwrap();

    let reopened = TaskStore::open(&path).unwrap();
    let tasks = reopened.list_all_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "endpoints");
    assert!(reopened
        .save_subject(&Subject::new("Programming").unwrap())
        .unwrap_err()
        .is_duplicate());
}

#[test]
fn corrupted_due_date_is_reported_as_invalid_data() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");
    store
        .connection()
        .execute(
            "INSERT INTO tasks (name, due_date, description, subject_id) VALUES ('bad', '2025/06/20', NULL, ?1);",
            [subject.id.unwrap()],
        )
        .unwrap();

    assert!(matches!(
        store.list_all_tasks(),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn null_description_loads_as_empty() {
    let store = TaskStore::open_in_memory().unwrap();
    let subject = saved_subject(&store, "Programming");
    store
        .connection()
        .execute(
            "INSERT INTO tasks (name, due_date, description, subject_id) VALUES ('legacy', '2025-06-20', NULL, ?1);",
            [subject.id.unwrap()],
        )
        .unwrap();

    let tasks = store.list_all_tasks().unwrap();
    assert_eq!(tasks[0].description, "");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAgendaRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE subjects (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
         CREATE TABLE tasks (id INTEGER PRIMARY KEY, name TEXT NOT NULL, subject_id INTEGER);",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        TaskStore::from_connection(conn),
        Err(RepoError::MissingRequiredColumn {
            table: "tasks",
            column: "due_date"
        })
    ));
}

#[test]
fn repository_over_migrated_connection_shares_rows_with_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.sqlite3");

    let store = TaskStore::open(&path).unwrap();
    saved_subject(&store, "Programming");

    let repo = SqliteAgendaRepository::try_new(store.connection()).unwrap();
    assert_eq!(repo.list_subjects().unwrap().len(), 1);
}
