//! Database layer for promptbook.
//!
//! Provides a `Database` struct that owns the SQLite connection and hands
//! out the [`Prompts`] store. The connection is released when the
//! `Database` is dropped.

mod clock;
mod error;
mod prompts;

pub use error::{StoreError, ValidationError};
pub use prompts::{Prompt, PromptQuery, Prompts, SortOrder};

use clock::{parse_timestamp, Clock};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// The main database struct that owns the SQLite connection.
pub struct Database {
    conn: Mutex<Connection>,
    clock: Clock,
}

impl Database {
    /// Open or create a database at the default location.
    ///
    /// The default location is `~/.local/share/promptbook/promptbook.db`.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(&Self::default_path())
    }

    /// Open or create a database at a specific path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        debug!(path = %path.display(), "Opening prompt database");
        let conn = Connection::open(path)?;
        Self::from_connection(conn, Clock::system())
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, Clock::system())
    }

    /// Get the default database path.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptbook")
            .join("promptbook.db")
    }

    /// Access the prompts store.
    ///
    /// The store holds the connection lock until it is dropped.
    pub fn prompts(&self) -> Prompts<'_> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        Prompts::new(conn, &self.clock)
    }

    fn from_connection(conn: Connection, clock: Clock) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Self::register_functions(&conn)?;

        // Timestamps must keep increasing across restarts.
        let latest: Option<String> =
            conn.query_row("SELECT MAX(updated_at) FROM prompts", [], |row| row.get(0))?;
        if let Some(latest) = latest.as_deref().and_then(|raw| parse_timestamp(raw).ok()) {
            clock.advance_past(latest);
        }

        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    /// Initialize the database schema.
    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS prompts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                prompt TEXT NOT NULL CHECK (length(trim(prompt)) > 0),
                is_favorite INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_prompts_created_at ON prompts(created_at);
            "#,
        )
    }

    /// `contains_ci(haystack, needle)`: Unicode-aware case-insensitive
    /// substring test used by the search filter.
    fn register_functions(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.create_scalar_function(
            "contains_ci",
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let haystack = ctx.get::<String>(0)?;
                let needle = ctx.get::<String>(1)?;
                Ok(haystack.to_lowercase().contains(&needle.to_lowercase()))
            },
        )
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory_with_clock(
        source: fn() -> chrono::DateTime<chrono::Utc>,
    ) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, Clock::new(source))
    }
}
