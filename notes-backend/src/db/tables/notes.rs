//! Note database operations. Every call runs exactly one SQL statement.

use rusqlite::{Row, params};

use crate::error::DbError;
use crate::models::{NewNote, Note};
use super::super::Database;

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Build a `LIKE ... ESCAPE '\'` pattern matching any value that contains `text` literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Database {
    /// All notes owned by `user_id`, oldest first
    pub fn list_notes(&self, user_id: i64) -> Result<Vec<Note>, DbError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content, created_at
             FROM notes
             WHERE user_id = ?1
             ORDER BY id",
        )?;

        let notes = stmt
            .query_map([user_id], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Notes owned by `user_id` whose title or content contains `text`.
    /// An empty `text` matches every note.
    pub fn filter_notes(&self, user_id: i64, text: &str) -> Result<Vec<Note>, DbError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content, created_at
             FROM notes
             WHERE user_id = ?1
               AND (title LIKE ?2 ESCAPE '\\' OR content LIKE ?2 ESCAPE '\\')
             ORDER BY id",
        )?;

        let notes = stmt
            .query_map(params![user_id, contains_pattern(text)], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Insert a note for `user_id` and return the stored row, timestamp included.
    pub fn add_note(&self, user_id: i64, note: &NewNote) -> Result<Note, DbError> {
        let conn = self.conn()?;
        let stored = conn.query_row(
            "INSERT INTO notes (user_id, title, content) VALUES (?1, ?2, ?3)
             RETURNING id, user_id, title, content, created_at",
            params![user_id, note.title, note.content],
            note_from_row,
        )?;
        Ok(stored)
    }
}
