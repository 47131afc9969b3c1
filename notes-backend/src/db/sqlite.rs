//! SQLite database handle - connection pool, schema and first-run seeding.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

use crate::error::DbError;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Account that always exists after bootstrap
pub const DEFAULT_USERNAME: &str = "user";
pub const DEFAULT_PASSWORD: &str = "pass";

const LONG_SAMPLE_NOTE: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.
<strong>Pellentesque risus mi</strong>, tempus quis placerat ut, porta nec
nulla. Vestibulum rhoncus ac ex sit amet fringilla. Nullam gravida purus
diam, et dictum <a>felis venenatis</a> efficitur. Aenean ac
<em>eleifend lacus</em>, in mollis lectus. Donec sodales, arcu et
sollicitudin porttitor, tortor urna tempor ligula, id porttitor mi magna a
neque. Donec dui urna, vehicula et sem eget, facilisis sodales sem.";

/// Notes given to the default account while it owns none
pub const SAMPLE_NOTES: &[(&str, &str)] = &[
    ("Welcome!", "This is your first note."),
    ("Reminder", "Don't forget to update your notes regularly."),
    ("Important", "Remember to backup your notes."),
    ("Ideas", "Brainstorm some new ideas for your project."),
    ("Meeting", "Prepare agenda for the upcoming meeting."),
    ("Hello World", LONG_SAMPLE_NOTE),
];

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users (id)
    );

    CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes (user_id);

    CREATE TABLE IF NOT EXISTS auth_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        token TEXT NOT NULL UNIQUE,
        user_id INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users (id)
    );
";

/// Pooled access to the notes database
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (creating if needed) the database file and make sure the schema exists.
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self, DbError> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("[DB] Could not create {}: {}", parent.display(), e);
                }
            }
        }

        let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
        });
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let db = Self { pool };
        db.init_tables()?;
        Ok(db)
    }

    /// Check a connection out of the pool
    pub fn conn(&self) -> Result<DbConn, DbError> {
        Ok(self.pool.get()?)
    }

    /// Round-trip a query against the accounts table through a pooled connection
    pub fn ping(&self) -> Result<(), DbError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn init_tables(&self) -> Result<(), DbError> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Ensure the default account exists and, if `with_sample_notes` is set and the
    /// account owns no notes, insert [`SAMPLE_NOTES`] for it. Safe to run on every start.
    ///
    /// Returns the default account's id.
    pub fn seed_defaults(&self, with_sample_notes: bool) -> Result<i64, DbError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO users (username, password) VALUES (?1, ?2)",
            params![DEFAULT_USERNAME, DEFAULT_PASSWORD],
        )?;
        let user_id: i64 = tx.query_row(
            "SELECT id FROM users WHERE username = ?1",
            [DEFAULT_USERNAME],
            |row| row.get(0),
        )?;

        if with_sample_notes {
            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM notes WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;

            if count == 0 {
                {
                    let mut stmt =
                        tx.prepare("INSERT INTO notes (user_id, title, content) VALUES (?1, ?2, ?3)")?;
                    for (title, content) in SAMPLE_NOTES {
                        stmt.execute(params![user_id, title, content])?;
                    }
                }
                log::info!(
                    "[DB] Seeded {} sample notes for '{}'",
                    SAMPLE_NOTES.len(),
                    DEFAULT_USERNAME
                );
            }
        }

        tx.commit()?;
        Ok(user_id)
    }
}

#[cfg(test)]
pub(crate) fn test_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.db");
    let db = Database::new(path.to_str().unwrap(), 4).expect("Failed to open database");
    (dir, db)
}
