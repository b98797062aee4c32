use honeydo_core::db::open_db_in_memory;
use honeydo_core::{
    Anonymous, AuthUser, CreateTaskRequest, ServiceError, SqliteTaskRepository, TaskService,
    TaskStatus,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

const FIXED_NOW_MS: i64 = 1_750_000_000_000;

fn alice() -> AuthUser {
    AuthUser::new("user-alice", "alice@example.com")
}

fn bob() -> AuthUser {
    AuthUser::new("user-bob", "bob@example.com")
}

fn fixed_clock() -> i64 {
    FIXED_NOW_MS
}

fn service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::new(conn)).with_clock(fixed_clock)
}

fn request(title: &str, category: Option<&str>) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        notes: None,
        category: category.map(str::to_string),
    }
}

#[test]
fn create_task_rejects_whitespace_titles() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for title in ["", "   ", "\n\t"] {
        let err = service
            .create_task(&alice(), &request(title, None))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    let listed = service.list_tasks(&alice(), None).unwrap();
    assert!(listed.tasks.is_empty());
}

#[test]
fn create_task_defaults_category_and_starts_open() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let task = service
        .create_task(
            &alice(),
            &CreateTaskRequest {
                title: "  Clean gutters ".to_string(),
                notes: Some("   ".to_string()),
                category: None,
            },
        )
        .unwrap();

    assert_eq!(task.title, "Clean gutters");
    assert_eq!(task.notes, None);
    assert_eq!(task.category, "home");
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.position, 0);
    assert_eq!(task.created_by, "user-alice");
}

#[test]
fn create_task_appends_after_current_max_position() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (id, title, category, status, position, created_by)
         VALUES (?1, 'existing', 'home', 'open', 4, 'user-bob');",
        params![Uuid::new_v4().to_string()],
    )
    .unwrap();
    let service = service(&conn);

    let home = service
        .create_task(&alice(), &request("Mow lawn", Some("home")))
        .unwrap();
    let grocery = service
        .create_task(&alice(), &request("Bread", Some("grocery")))
        .unwrap();

    assert_eq!(home.position, 5);
    assert_eq!(grocery.position, 0);
}

#[test]
fn status_cycle_stamps_and_clears_completion() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Laundry", None))
        .unwrap();

    let change = service
        .update_task_status(&bob(), task.id, TaskStatus::Open)
        .unwrap();
    assert_eq!(change.status, TaskStatus::InProgress);
    let stored = service.get_task(&bob(), task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::InProgress);
    assert_eq!(stored.completed_at, None);

    service
        .update_task_status(&bob(), task.id, TaskStatus::InProgress)
        .unwrap();
    let stored = service.get_task(&bob(), task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Done);
    assert_eq!(stored.completed_by.as_deref(), Some("user-bob"));
    assert_eq!(stored.completed_by_email.as_deref(), Some("bob@example.com"));
    assert_eq!(stored.completed_at, Some(FIXED_NOW_MS));

    service
        .update_task_status(&alice(), task.id, TaskStatus::Done)
        .unwrap();
    let stored = service.get_task(&alice(), task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Open);
    assert_eq!(stored.completed_by, None);
    assert_eq!(stored.completed_by_email, None);
    assert_eq!(stored.completed_at, None);
}

#[test]
fn full_cycle_returns_to_open() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Water plants", None))
        .unwrap();

    let mut current = task.status;
    for _ in 0..3 {
        current = service
            .update_task_status(&alice(), task.id, current)
            .unwrap()
            .status;
    }

    assert_eq!(current, TaskStatus::Open);
    let stored = service.get_task(&alice(), task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Open);
}

#[test]
fn stale_current_status_produces_stale_transition() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Dishes", None))
        .unwrap();

    service
        .update_task_status(&alice(), task.id, TaskStatus::Open)
        .unwrap();
    // Second client still holds `open`.
    service
        .update_task_status(&bob(), task.id, TaskStatus::Open)
        .unwrap();

    let stored = service.get_task(&alice(), task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::InProgress);
}

#[test]
fn status_update_on_missing_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let missing = Uuid::new_v4();

    let err = service
        .update_task_status(&alice(), missing, TaskStatus::Open)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id, .. } if id == missing));
}

#[test]
fn update_task_overwrites_title_and_notes_only() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Paint fence", None))
        .unwrap();
    service
        .update_task_status(&alice(), task.id, TaskStatus::InProgress)
        .unwrap();

    service
        .update_task(&bob(), task.id, "  Paint back fence ", Some(" white "))
        .unwrap();

    let stored = service.get_task(&bob(), task.id).unwrap().unwrap();
    assert_eq!(stored.title, "Paint back fence");
    assert_eq!(stored.notes.as_deref(), Some("white"));
    assert_eq!(stored.status, TaskStatus::Done);
    assert_eq!(stored.position, task.position);
    assert_eq!(stored.completed_by.as_deref(), Some("user-alice"));

    service.update_task(&bob(), task.id, "Paint fence", Some("")).unwrap();
    let stored = service.get_task(&bob(), task.id).unwrap().unwrap();
    assert_eq!(stored.notes, None);
}

#[test]
fn update_task_rejects_whitespace_title_and_keeps_row() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Vacuum", None))
        .unwrap();

    let err = service.update_task(&alice(), task.id, "   ", None).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let stored = service.get_task(&alice(), task.id).unwrap().unwrap();
    assert_eq!(stored.title, "Vacuum");
}

#[test]
fn update_task_on_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .update_task(&alice(), Uuid::new_v4(), "Title", None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "task", .. }));
}

#[test]
fn any_user_can_delete_and_delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Trash out", None))
        .unwrap();

    service.delete_task(&bob(), task.id).unwrap();
    service.delete_task(&bob(), task.id).unwrap();
    service.delete_task(&bob(), Uuid::new_v4()).unwrap();

    assert!(service.get_task(&alice(), task.id).unwrap().is_none());
}

#[test]
fn list_tasks_reports_revision_after_mutations() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let before = service.list_tasks(&alice(), Some("grocery")).unwrap();
    assert_eq!(before.category, "grocery");
    assert_eq!(before.revision, 0);

    service
        .create_task(&alice(), &request("Apples", Some("grocery")))
        .unwrap();
    service
        .create_task(&alice(), &request("Pears", Some("grocery")))
        .unwrap();

    let after = service.list_tasks(&alice(), Some("grocery")).unwrap();
    assert_eq!(after.revision, 2);
    let titles: Vec<_> = after.tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["Apples", "Pears"]);
}

#[test]
fn every_operation_requires_a_session() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = service
        .create_task(&alice(), &request("Keep me", None))
        .unwrap();

    assert!(matches!(
        service.create_task(&Anonymous, &request("x", None)),
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.update_task_status(&Anonymous, task.id, TaskStatus::Open),
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.update_task(&Anonymous, task.id, "y", None),
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.delete_task(&Anonymous, task.id),
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.list_tasks(&None::<AuthUser>, None),
        Err(ServiceError::Unauthorized)
    ));

    let stored = service.get_task(&alice(), task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Open);
}
