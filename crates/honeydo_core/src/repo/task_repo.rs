//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `tasks` table.
//! - Assign per-category positions at insert time.
//!
//! # Invariants
//! - Position assignment (`max + 1`, or `0` for an empty category) happens
//!   in the same statement as the insert.
//! - Lists are ordered by `position ASC, created_at ASC, id ASC`.
//! - Updates that match no row return `RepoError::NotFound`; deletes do not.

use crate::model::task::{NewTask, StatusChange, Task, TaskId, TaskStatus};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    notes,
    category,
    status,
    position,
    created_by,
    created_at,
    completed_by,
    completed_by_email,
    completed_at
FROM tasks";

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Inserts an `open` task at the end of its category and returns the stored row.
    fn insert_task(&self, task: &NewTask) -> RepoResult<Task>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists one category in display order.
    fn list_tasks(&self, category: &str) -> RepoResult<Vec<Task>>;
    /// Highest position used in `category`, `None` when it is empty.
    fn max_position(&self, category: &str) -> RepoResult<Option<i64>>;
    /// Writes status and completion columns.
    fn apply_status_change(&self, id: TaskId, change: &StatusChange) -> RepoResult<()>;
    /// Overwrites title and notes only.
    fn update_task_content(&self, id: TaskId, title: &str, notes: Option<&str>) -> RepoResult<()>;
    /// Deletes one task. Returns whether a row was removed.
    fn delete_task(&self, id: TaskId) -> RepoResult<bool>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &NewTask) -> RepoResult<Task> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (id, title, notes, category, status, position, created_by)
             SELECT ?1, ?2, ?3, ?4, ?5, COALESCE(MAX(position), -1) + 1, ?6
             FROM tasks
             WHERE category = ?4;",
            params![
                id.to_string(),
                task.title.as_str(),
                task.notes.as_deref(),
                task.category.as_str(),
                TaskStatus::Open.as_str(),
                task.created_by.as_str(),
            ],
        )?;

        self.get_task(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted task {id} missing on read-back"))
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, category: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE category = ?1
             ORDER BY position ASC, created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([category])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn max_position(&self, category: &str) -> RepoResult<Option<i64>> {
        let max = self
            .conn
            .query_row(
                "SELECT position
                 FROM tasks
                 WHERE category = ?1
                 ORDER BY position DESC
                 LIMIT 1;",
                [category],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(max)
    }

    fn apply_status_change(&self, id: TaskId, change: &StatusChange) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                status = ?2,
                completed_by = ?3,
                completed_by_email = ?4,
                completed_at = ?5
             WHERE id = ?1;",
            params![
                id.to_string(),
                change.status.as_str(),
                change.completed_by.as_deref(),
                change.completed_by_email.as_deref(),
                change.completed_at,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    fn update_task_content(&self, id: TaskId, title: &str, notes: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, notes = ?3 WHERE id = ?1;",
            params![id.to_string(), title, notes],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let task = Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        notes: row.get("notes")?,
        category: row.get("category")?,
        status,
        position: row.get("position")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        completed_by: row.get("completed_by")?,
        completed_by_email: row.get("completed_by_email")?,
        completed_at: row.get("completed_at")?,
    };
    task.validate()
        .map_err(|err| RepoError::InvalidData(format!("task {}: {err}", task.id)))?;
    Ok(task)
}
