//! Note use-case service.
//!
//! # Responsibility
//! - Provide create / list / delete APIs scoped to the acting user.
//!
//! # Invariants
//! - Notes are only ever deleted by their owner.
//! - A delete by a non-owner, or of a missing note, is not an error.

use crate::auth::AuthProvider;
use crate::model::note::{normalize_content, Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::service::{require_user, ListRevision, ServiceResult};
use log::{debug, info, warn};

/// What a delete request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteDeleteOutcome {
    Deleted,
    /// No note with this id exists.
    Missing,
    /// The note belongs to someone else and was left untouched.
    NotOwner,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    revision: ListRevision,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_revision(repo, ListRevision::new())
    }

    pub fn with_revision(repo: R, revision: ListRevision) -> Self {
        Self { repo, revision }
    }

    pub fn revision(&self) -> &ListRevision {
        &self.revision
    }

    /// Creates one note owned by the acting user.
    ///
    /// # Errors
    /// - `Unauthorized` without a session.
    /// - `Validation` when content is blank; nothing is persisted.
    pub fn create_note(&self, auth: &impl AuthProvider, content: &str) -> ServiceResult<Note> {
        let user = require_user(auth, "note_create")?;
        let content = normalize_content(content)?;

        let note = self.repo.insert_note(user.id.as_str(), content.as_str())?;
        self.revision.bump();
        info!(
            "event=note_create module=note_service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    /// Lists the acting user's notes, newest first.
    pub fn list_notes(&self, auth: &impl AuthProvider) -> ServiceResult<Vec<Note>> {
        let user = require_user(auth, "note_list")?;
        let notes = self.repo.list_notes(user.id.as_str())?;
        debug!(
            "event=note_list module=note_service status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Deletes a note if the acting user owns it.
    ///
    /// Ownership is checked here before the delete is issued; the storage
    /// delete is additionally filtered by owner.
    pub fn delete_note(
        &self,
        auth: &impl AuthProvider,
        note_id: NoteId,
    ) -> ServiceResult<NoteDeleteOutcome> {
        let user = require_user(auth, "note_delete")?;

        let outcome = match self.repo.get_note(note_id)? {
            None => NoteDeleteOutcome::Missing,
            Some(note) if !note.is_owned_by(user.id.as_str()) => NoteDeleteOutcome::NotOwner,
            Some(_) => {
                if self.repo.delete_note(note_id, user.id.as_str())? {
                    NoteDeleteOutcome::Deleted
                } else {
                    NoteDeleteOutcome::Missing
                }
            }
        };

        match outcome {
            NoteDeleteOutcome::Deleted => {
                self.revision.bump();
                info!("event=note_delete module=note_service status=ok note_id={note_id}");
            }
            NoteDeleteOutcome::Missing => {
                debug!("event=note_delete module=note_service status=noop note_id={note_id}");
            }
            NoteDeleteOutcome::NotOwner => {
                warn!(
                    "event=note_delete module=note_service status=rejected reason=not_owner note_id={note_id}"
                );
            }
        }
        Ok(outcome)
    }
}
