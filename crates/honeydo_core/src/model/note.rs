//! Note domain model.
//!
//! # Invariants
//! - `content` is trimmed and non-empty.
//! - `user_id` is the owner; it never changes after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for notes.
pub type NoteId = Uuid;

/// Owner-scoped free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    /// Owning user id. All reads and deletes are filtered by it.
    pub user_id: String,
    /// Unix epoch milliseconds, assigned by storage.
    pub created_at: i64,
}

impl Note {
    /// Whether `user_id` owns this note.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Content is empty after trimming.
    BlankContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankContent => write!(f, "note content is required"),
        }
    }
}

impl Error for NoteValidationError {}

/// Trims note content and rejects blank values.
pub fn normalize_content(content: &str) -> Result<String, NoteValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::BlankContent);
    }
    Ok(trimmed.to_string())
}
