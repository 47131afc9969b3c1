//! Login sessions carried per request.
//!
//! The browser holds a random token in the [`SESSION_COOKIE`] cookie and every
//! handler resolves it through the [`SessionStore`] kept in the application state.
//! Resolved tokens are cached for a short while so the hot path rarely touches
//! SQLite; the `auth_sessions` table stays authoritative.

use chrono::Utc;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::db::Database;
use crate::error::DbError;
use crate::models::Session;

pub const SESSION_COOKIE: &str = "notes_session";

const CACHE_TTL: Duration = Duration::from_secs(60);
const CACHE_CAPACITY: u64 = 10_000;

pub struct SessionStore {
    db: Arc<Database>,
    ttl: chrono::Duration,
    cache: Cache<String, Session>,
}

impl SessionStore {
    pub fn new(db: Arc<Database>, ttl: chrono::Duration) -> Self {
        Self {
            db,
            ttl,
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Sliding lifetime applied to every session
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Open a new session for `user_id`
    pub fn start(&self, user_id: i64) -> Result<Session, DbError> {
        let session = self.db.create_session(user_id, self.ttl)?;
        self.cache.insert(session.token.clone(), session.clone());
        log::debug!("[SESSIONS] Started session {} for user {}", session.id, user_id);
        Ok(session)
    }

    /// Look up the live session behind `token`, extending its expiry.
    pub fn resolve(&self, token: &str) -> Result<Option<Session>, DbError> {
        if token.is_empty() {
            return Ok(None);
        }

        if let Some(session) = self.cache.get(token) {
            if !session.is_expired_at(Utc::now()) {
                return Ok(Some(session));
            }
            self.cache.invalidate(token);
        }

        let session = self.db.validate_session(token, self.ttl)?;
        if let Some(ref session) = session {
            self.cache.insert(token.to_string(), session.clone());
        }
        Ok(session)
    }

    /// End the session behind `token` (logout). Returns whether one existed.
    pub fn end(&self, token: &str) -> Result<bool, DbError> {
        self.cache.invalidate(token);
        self.db.delete_session(token)
    }
}
