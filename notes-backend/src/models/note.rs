use chrono::NaiveDateTime;

use crate::error::{TimestampError, ValidationError};

/// Format SQLite's `CURRENT_TIMESTAMP` writes into `notes.created_at`
pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format shown next to each note
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Title given to notes submitted through the single-field `noteContent` form
pub const LEGACY_NOTE_TITLE: &str = "New Note";

/// A stored note. `created_at` is kept exactly as the store wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl Note {
    pub fn created_at_parsed(&self) -> Result<NaiveDateTime, TimestampError> {
        NaiveDateTime::parse_from_str(self.created_at.trim(), STORED_TIMESTAMP_FORMAT).map_err(
            |source| TimestampError {
                raw: self.created_at.clone(),
                source,
            },
        )
    }

    /// Human-readable creation date, e.g. `19.10.2026 14:05`
    pub fn display_date(&self) -> Result<String, TimestampError> {
        Ok(self
            .created_at_parsed()?
            .format(DISPLAY_TIMESTAMP_FORMAT)
            .to_string())
    }
}

/// Validated input for inserting a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    /// Both fields are required; surrounding whitespace is dropped.
    pub fn new(title: &str, content: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        let content = content.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}
