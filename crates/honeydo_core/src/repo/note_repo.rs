//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped persistence APIs over the `notes` table.
//!
//! # Invariants
//! - List and delete statements always filter by `user_id`, mirroring the
//!   row-level policy of the hosted store.
//! - Lists are ordered by `created_at DESC, id ASC`.

use crate::model::note::{Note, NoteId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT id, content, user_id, created_at FROM notes";

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts one note for `user_id` and returns the stored row.
    fn insert_note(&self, user_id: &str, content: &str) -> RepoResult<Note>;
    /// Reads one note regardless of owner.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists notes owned by `user_id`, newest first.
    fn list_notes(&self, user_id: &str) -> RepoResult<Vec<Note>>;
    /// Deletes `id` only when owned by `user_id`. Returns whether a row was removed.
    fn delete_note(&self, id: NoteId, user_id: &str) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, user_id: &str, content: &str) -> RepoResult<Note> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO notes (id, content, user_id) VALUES (?1, ?2, ?3);",
            params![id.to_string(), content, user_id],
        )?;

        self.get_note(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted note {id} missing on read-back"))
        })
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self, user_id: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId, user_id: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id],
        )?;
        Ok(changed > 0)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let content: String = row.get("content")?;
    if content.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank content in notes.content for {id_text}"
        )));
    }

    Ok(Note {
        id: parse_uuid(&id_text, "notes.id")?,
        content,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
    })
}
