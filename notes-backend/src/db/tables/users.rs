//! User account database operations

use rusqlite::{ErrorCode, OptionalExtension, params};

use crate::error::DbError;
use crate::models::User;
use super::super::Database;

impl Database {
    /// Find the account whose username and password both match exactly.
    /// Passwords are stored and compared as plaintext.
    pub fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DbError> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1 AND password = ?2",
                params![username, password],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, DbError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a new account. A username collision maps to [`DbError::UsernameTaken`].
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, DbError> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![username, password],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(DbError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
