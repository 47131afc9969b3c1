use thiserror::Error;

/// Failures of the data layer. Handlers log these and answer with a generic response.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("session lifetime {0} is out of range")]
    SessionLifetimeOutOfRange(chrono::Duration),
}

/// A stored note timestamp that does not match the store's `YYYY-MM-DD HH:MM:SS` format.
///
/// Kept apart from [`DbError`]: the row was read fine, only its presentation failed.
#[derive(Error, Debug)]
#[error("unrecognized timestamp {raw:?}: {source}")]
pub struct TimestampError {
    pub raw: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Rejected add-note input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("note title is empty")]
    EmptyTitle,

    #[error("note content is empty")]
    EmptyContent,
}
