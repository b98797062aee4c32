//! Core domain logic for the HoneyDo shared task list and personal notes.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{Anonymous, AuthProvider, AuthUser};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::task::{
    category_label, NewTask, StatusChange, Task, TaskId, TaskStatus, TaskValidationError,
    DEFAULT_CATEGORY,
};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{NoteDeleteOutcome, NoteService};
pub use service::task_service::{CreateTaskRequest, TaskListView, TaskService};
pub use service::{ListRevision, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
