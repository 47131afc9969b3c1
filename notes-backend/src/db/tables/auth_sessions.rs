//! Auth session database operations

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::DbError;
use crate::models::Session;
use super::super::Database;

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// `at + ttl`, or an error when the result leaves chrono's representable range
fn expiry_after(at: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, DbError> {
    at.checked_add_signed(ttl)
        .ok_or(DbError::SessionLifetimeOutOfRange(ttl))
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        token: row.get(1)?,
        user_id: row.get(2)?,
        expires_at: parse_timestamp(row, 3)?,
    })
}

impl Database {
    /// Create a new login session for `user_id`
    pub fn create_session(&self, user_id: i64, ttl: Duration) -> Result<Session, DbError> {
        let conn = self.conn()?;
        let token = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let expires_at = expiry_after(created_at, ttl)?;

        conn.execute(
            "INSERT INTO auth_sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                &token,
                user_id,
                format_timestamp(created_at),
                format_timestamp(expires_at),
            ],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Session {
            id,
            token,
            user_id,
            expires_at,
        })
    }

    /// Validate a session token and extend its expiry if valid
    pub fn validate_session(&self, token: &str, ttl: Duration) -> Result<Option<Session>, DbError> {
        let conn = self.conn()?;
        let now = Utc::now();

        let session = conn
            .query_row(
                "SELECT id, token, user_id, expires_at
                 FROM auth_sessions WHERE token = ?1 AND expires_at > ?2",
                params![token, format_timestamp(now)],
                session_from_row,
            )
            .optional()?;

        let Some(mut session) = session else {
            return Ok(None);
        };

        // Keep active sessions alive
        let new_expires = expiry_after(now, ttl)?;
        conn.execute(
            "UPDATE auth_sessions SET expires_at = ?1 WHERE token = ?2",
            params![format_timestamp(new_expires), token],
        )?;
        session.expires_at = new_expires;

        Ok(Some(session))
    }

    /// Delete a session (logout)
    pub fn delete_session(&self, token: &str) -> Result<bool, DbError> {
        let conn = self.conn()?;
        let rows_affected = conn.execute("DELETE FROM auth_sessions WHERE token = ?1", [token])?;
        Ok(rows_affected > 0)
    }

    /// Drop every session whose expiry has passed. Returns how many were removed.
    pub fn purge_expired_sessions(&self) -> Result<usize, DbError> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM auth_sessions WHERE expires_at <= ?1",
            [format_timestamp(Utc::now())],
        )?;
        Ok(removed)
    }
}
