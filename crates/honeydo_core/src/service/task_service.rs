//! Task use-case service.
//!
//! # Responsibility
//! - Provide create / edit / delete / status-cycle entry points.
//! - Normalize form input before it reaches the repository.
//!
//! # Invariants
//! - The next status is derived from the caller-supplied current status,
//!   not re-read from storage.
//! - Deleting a missing task is a successful no-op.
//! - Edits never touch status, position or completion fields.

use crate::auth::AuthProvider;
use crate::model::task::{
    normalize_category, normalize_notes, normalize_title, NewTask, StatusChange, Task, TaskId,
    TaskStatus,
};
use crate::repo::task_repo::TaskRepository;
use crate::service::{now_epoch_ms, require_user, ListRevision, ServiceResult};
use log::{debug, info};

/// Raw create-task form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub title: String,
    pub notes: Option<String>,
    /// `None` or blank selects the default category.
    pub category: Option<String>,
}

/// One category's tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub category: String,
    /// Revision observed before the read.
    pub revision: u64,
    pub tasks: Vec<Task>,
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    revision: ListRevision,
    clock: fn() -> i64,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service with its own list revision.
    pub fn new(repo: R) -> Self {
        Self::with_revision(repo, ListRevision::new())
    }

    /// Creates a service that bumps a shared list revision.
    pub fn with_revision(repo: R, revision: ListRevision) -> Self {
        Self {
            repo,
            revision,
            clock: now_epoch_ms,
        }
    }

    /// Replaces the wall clock used for `completed_at`.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn revision(&self) -> &ListRevision {
        &self.revision
    }

    /// Creates a task at the end of its category.
    ///
    /// # Errors
    /// - `Unauthorized` without a session.
    /// - `Validation` when the title is blank after trimming.
    pub fn create_task(
        &self,
        auth: &impl AuthProvider,
        request: &CreateTaskRequest,
    ) -> ServiceResult<Task> {
        let user = require_user(auth, "task_create")?;
        let new_task = NewTask::from_form(
            request.title.as_str(),
            request.notes.as_deref(),
            request.category.as_deref(),
            user.id.as_str(),
        )?;

        let task = self.repo.insert_task(&new_task)?;
        self.revision.bump();
        info!(
            "event=task_create module=task_service status=ok task_id={} category={} position={}",
            task.id, task.category, task.position
        );
        Ok(task)
    }

    /// Advances the status one step from `current_status`.
    ///
    /// Entering `done` stamps the acting user and the current time;
    /// leaving it clears them. A stale `current_status` yields a stale
    /// transition.
    ///
    /// # Errors
    /// - `Unauthorized` without a session.
    /// - `NotFound` when `task_id` matches no task.
    pub fn update_task_status(
        &self,
        auth: &impl AuthProvider,
        task_id: TaskId,
        current_status: TaskStatus,
    ) -> ServiceResult<StatusChange> {
        let user = require_user(auth, "task_status")?;
        let change = StatusChange::advance(
            current_status,
            user.id.as_str(),
            user.email.as_str(),
            (self.clock)(),
        );

        self.repo.apply_status_change(task_id, &change)?;
        self.revision.bump();
        info!(
            "event=task_status module=task_service status=ok task_id={} from={} to={}",
            task_id, current_status, change.status
        );
        Ok(change)
    }

    /// Deletes a task. Missing ids succeed without effect.
    pub fn delete_task(&self, auth: &impl AuthProvider, task_id: TaskId) -> ServiceResult<()> {
        require_user(auth, "task_delete")?;
        if self.repo.delete_task(task_id)? {
            self.revision.bump();
            info!("event=task_delete module=task_service status=ok task_id={task_id}");
        } else {
            debug!("event=task_delete module=task_service status=noop task_id={task_id}");
        }
        Ok(())
    }

    /// Overwrites title and notes.
    ///
    /// # Errors
    /// - `Unauthorized` without a session.
    /// - `Validation` when the title is blank after trimming.
    /// - `NotFound` when `task_id` matches no task.
    pub fn update_task(
        &self,
        auth: &impl AuthProvider,
        task_id: TaskId,
        title: &str,
        notes: Option<&str>,
    ) -> ServiceResult<()> {
        require_user(auth, "task_update")?;
        let title = normalize_title(title)?;
        let notes = normalize_notes(notes);

        self.repo
            .update_task_content(task_id, title.as_str(), notes.as_deref())?;
        self.revision.bump();
        info!("event=task_update module=task_service status=ok task_id={task_id}");
        Ok(())
    }

    /// Gets one task by id.
    pub fn get_task(
        &self,
        auth: &impl AuthProvider,
        task_id: TaskId,
    ) -> ServiceResult<Option<Task>> {
        require_user(auth, "task_get")?;
        Ok(self.repo.get_task(task_id)?)
    }

    /// Lists one category ordered by position.
    pub fn list_tasks(
        &self,
        auth: &impl AuthProvider,
        category: Option<&str>,
    ) -> ServiceResult<TaskListView> {
        require_user(auth, "task_list")?;
        let category = normalize_category(category);
        let revision = self.revision.current();
        let tasks = self.repo.list_tasks(category.as_str())?;
        debug!(
            "event=task_list module=task_service status=ok category={} count={} revision={}",
            category,
            tasks.len(),
            revision
        );
        Ok(TaskListView {
            category,
            revision,
            tasks,
        })
    }
}
