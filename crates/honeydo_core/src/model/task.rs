//! Task domain model.
//!
//! # Responsibility
//! - Define the `Task` record and its status cycle.
//! - Normalize form-style input (title, notes, category).
//! - Compute completion metadata for status transitions.
//!
//! # Invariants
//! - `title` is never blank once persisted.
//! - `completed_by`, `completed_by_email` and `completed_at` are set only
//!   while `status == TaskStatus::Done`.
//! - New tasks always start as `TaskStatus::Open`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for tasks.
pub type TaskId = Uuid;

/// Category used when the caller does not provide one.
pub const DEFAULT_CATEGORY: &str = "home";

/// Fixed rotation applied by each status toggle.
const STATUS_CYCLE: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Done];

/// Task lifecycle state. No state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started. Initial state of every task.
    Open,
    /// Work is in progress.
    InProgress,
    /// Completed; completion metadata is stamped.
    Done,
}

impl TaskStatus {
    /// Stable string form used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the state that follows `self` in `open -> in_progress -> done -> open`.
    pub fn next(self) -> Self {
        let index = STATUS_CYCLE
            .iter()
            .position(|status| *status == self)
            .unwrap_or(0);
        STATUS_CYCLE[(index + 1) % STATUS_CYCLE.len()]
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(TaskValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Validation errors for task input and persisted task state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Status string is not one of `open|in_progress|done`.
    UnknownStatus(String),
    /// Completion fields are present on a task that is not done.
    CompletionWithoutDone(TaskStatus),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title is required"),
            Self::UnknownStatus(value) => write!(f, "unknown task status `{value}`"),
            Self::CompletionWithoutDone(status) => write!(
                f,
                "completion metadata must be empty for status `{status}`"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Storage-assigned stable ID.
    pub id: TaskId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Optional free text; `None` when the caller left it blank.
    pub notes: Option<String>,
    /// List partition this task belongs to.
    pub category: String,
    pub status: TaskStatus,
    /// Ascending display order inside `category`.
    pub position: i64,
    /// User id of the creator.
    pub created_by: String,
    /// Unix epoch milliseconds, assigned by storage.
    pub created_at: i64,
    pub completed_by: Option<String>,
    pub completed_by_email: Option<String>,
    /// Unix epoch milliseconds.
    pub completed_at: Option<i64>,
}

impl Task {
    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `BlankTitle` when `title` is blank.
    /// - `CompletionWithoutDone` when completion fields leak into a
    ///   non-done status.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        let has_completion = self.completed_by.is_some()
            || self.completed_by_email.is_some()
            || self.completed_at.is_some();
        if has_completion && self.status != TaskStatus::Done {
            return Err(TaskValidationError::CompletionWithoutDone(self.status));
        }
        Ok(())
    }

    /// Whether this task is currently completed.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Normalized input for inserting a task.
///
/// Position and identity are assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    pub category: String,
    pub created_by: String,
}

impl NewTask {
    /// Builds insert input from raw form values.
    ///
    /// Trims title and notes, maps blank notes to `None` and blank or
    /// missing category to [`DEFAULT_CATEGORY`].
    pub fn from_form(
        title: &str,
        notes: Option<&str>,
        category: Option<&str>,
        created_by: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            title: normalize_title(title)?,
            notes: normalize_notes(notes),
            category: normalize_category(category),
            created_by: created_by.into(),
        })
    }
}

/// Column values written by one status toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: TaskStatus,
    pub completed_by: Option<String>,
    pub completed_by_email: Option<String>,
    pub completed_at: Option<i64>,
}

impl StatusChange {
    /// Computes the change that follows `current`.
    ///
    /// Entering `done` stamps the acting user and `now_ms`; every other
    /// target clears all completion fields.
    pub fn advance(current: TaskStatus, actor_id: &str, actor_email: &str, now_ms: i64) -> Self {
        let status = current.next();
        if status == TaskStatus::Done {
            Self {
                status,
                completed_by: Some(actor_id.to_string()),
                completed_by_email: Some(actor_email.to_string()),
                completed_at: Some(now_ms),
            }
        } else {
            Self {
                status,
                completed_by: None,
                completed_by_email: None,
                completed_at: None,
            }
        }
    }
}

/// Trims a title and rejects blank values.
pub fn normalize_title(title: &str) -> Result<String, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

/// Trims notes; blank notes become `None`.
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Trims a category; blank or missing becomes [`DEFAULT_CATEGORY`].
pub fn normalize_category(category: Option<&str>) -> String {
    category
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

/// Display label for a category tab.
pub fn category_label(category: &str) -> &str {
    match category {
        "home" => "Home Tasks",
        "grocery" => "Grocery Lists",
        other => other,
    }
}
