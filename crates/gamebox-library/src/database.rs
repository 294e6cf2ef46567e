//! Library store using SQLite
//!
//! One row per document. The row key is the composite `{user}_{game}` id,
//! so writing the same pair twice overwrites instead of duplicating.

use crate::{EntryPatch, LibraryEntry, LibraryError, LibraryStore, composite_key, now_millis};
use gamebox_catalog::GameStatus;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

struct Inner {
    conn: Connection,
    /// Last `added_at` handed out; stamps are strictly increasing
    last_stamp: i64,
}

/// SQLite-backed library store
pub struct SqliteStore {
    inner: Mutex<Inner>,
}

impl SqliteStore {
    /// Open or create a database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, LibraryError> {
        Self::init_schema(&conn)?;

        let last_stamp: i64 = conn.query_row(
            "SELECT COALESCE(MAX(added_at), 0) FROM library_entries",
            [],
            |row| row.get(0),
        )?;

        Ok(Self {
            inner: Mutex::new(Inner { conn, last_stamp }),
        })
    }

    /// Initialize database schema
    fn init_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS library_entries (
                doc_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                game_id TEXT NOT NULL,
                title TEXT NOT NULL,
                cover_url TEXT NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                played_on TEXT NOT NULL DEFAULT '',
                user_review TEXT NOT NULL DEFAULT '',
                completed_at TEXT,
                added_at INTEGER NOT NULL,
                developer TEXT NOT NULL DEFAULT '',
                publisher TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                release_year INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_library_entries_user ON library_entries(user_id);
        "#,
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, LibraryError> {
        self.inner
            .lock()
            .map_err(|_| LibraryError::Database("connection lock poisoned".to_string()))
    }

    /// Upsert a full document, assigning `added_at`
    pub fn put_entry(&self, user_id: &str, entry: &LibraryEntry) -> Result<LibraryEntry, LibraryError> {
        let mut inner = self.lock()?;
        let doc_id = composite_key(user_id, &entry.id);

        let owner: Option<String> = inner
            .conn
            .query_row(
                "SELECT user_id FROM library_entries WHERE doc_id = ?1",
                params![doc_id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(owner) = owner
            && owner != user_id
        {
            return Err(LibraryError::InvalidEntry(format!(
                "document {} belongs to another user",
                doc_id
            )));
        }

        let stamp = now_millis().max(inner.last_stamp + 1);
        let mut stored = entry.clone();
        stored.added_at = stamp;

        inner.conn.execute(
            r#"INSERT OR REPLACE INTO library_entries
               (doc_id, user_id, game_id, title, cover_url, rating, status, played_on,
                user_review, completed_at, added_at, developer, publisher, description,
                release_year, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"#,
            params![
                doc_id,
                user_id,
                stored.id,
                stored.title,
                stored.cover_url,
                stored.rating,
                stored.status.as_str(),
                stored.played_on,
                stored.user_review,
                stored.completed_at,
                stored.added_at,
                stored.developer,
                stored.publisher,
                stored.description,
                stored.release_year,
                now_millis(),
            ],
        )?;

        inner.last_stamp = stamp;
        Ok(stored)
    }

    /// Update only the patched columns
    pub fn merge_entry(
        &self,
        user_id: &str,
        game_id: &str,
        patch: &EntryPatch,
    ) -> Result<(), LibraryError> {
        let mut columns: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(status) = patch.status {
            columns.push("status");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(rating) = patch.rating {
            columns.push("rating");
            values.push(Value::Real(f64::from(rating)));
        }
        if let Some(review) = &patch.user_review {
            columns.push("user_review");
            values.push(Value::Text(review.clone()));
        }
        if let Some(played_on) = &patch.played_on {
            columns.push("played_on");
            values.push(Value::Text(played_on.clone()));
        }
        if let Some(completed_at) = patch.completed_at {
            columns.push("completed_at");
            values.push(match completed_at {
                Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
                None => Value::Null,
            });
        }

        if columns.is_empty() {
            return Ok(());
        }

        columns.push("updated_at");
        values.push(Value::Integer(now_millis()));

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE library_entries SET {} WHERE doc_id = ?{} AND user_id = ?{}",
            assignments.join(", "),
            columns.len() + 1,
            columns.len() + 2
        );
        values.push(Value::Text(composite_key(user_id, game_id)));
        values.push(Value::Text(user_id.to_string()));

        let inner = self.lock()?;
        let changed = inner.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(LibraryError::EntryNotFound(game_id.to_string()));
        }

        Ok(())
    }

    /// Delete a document if present
    pub fn delete_entry(&self, user_id: &str, game_id: &str) -> Result<(), LibraryError> {
        let inner = self.lock()?;
        inner.conn.execute(
            "DELETE FROM library_entries WHERE doc_id = ?1 AND user_id = ?2",
            params![composite_key(user_id, game_id), user_id],
        )?;
        Ok(())
    }

    /// Fetch a single document
    pub fn get_entry(&self, user_id: &str, game_id: &str) -> Result<Option<LibraryEntry>, LibraryError> {
        let inner = self.lock()?;
        let entry = inner
            .conn
            .query_row(
                "SELECT * FROM library_entries WHERE doc_id = ?1 AND user_id = ?2",
                params![composite_key(user_id, game_id), user_id],
                Self::row_to_entry,
            )
            .optional()?;

        Ok(entry)
    }

    /// All documents of one user, in storage order
    pub fn list_entries(&self, user_id: &str) -> Result<Vec<LibraryEntry>, LibraryError> {
        let inner = self.lock()?;
        let mut stmt = inner
            .conn
            .prepare("SELECT * FROM library_entries WHERE user_id = ?1")?;

        let entries = stmt
            .query_map(params![user_id], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Number of documents owned by a user
    pub fn entry_count(&self, user_id: &str) -> Result<i64, LibraryError> {
        let inner = self.lock()?;
        let count: i64 = inner.conn.query_row(
            "SELECT COUNT(*) FROM library_entries WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Convert a row to a LibraryEntry
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<LibraryEntry> {
        let status: String = row.get("status")?;
        let status = status.parse::<GameStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
        let rating: f64 = row.get("rating")?;

        Ok(LibraryEntry {
            id: row.get("game_id")?,
            title: row.get("title")?,
            cover_url: row.get("cover_url")?,
            rating: rating as f32,
            status,
            played_on: row.get("played_on")?,
            user_review: row.get("user_review")?,
            completed_at: row.get("completed_at")?,
            added_at: row.get("added_at")?,
            developer: row.get("developer")?,
            publisher: row.get("publisher")?,
            description: row.get("description")?,
            release_year: row.get("release_year")?,
        })
    }
}

impl LibraryStore for SqliteStore {
    async fn put(&self, user_id: &str, entry: &LibraryEntry) -> Result<LibraryEntry, LibraryError> {
        self.put_entry(user_id, entry)
    }

    async fn merge(
        &self,
        user_id: &str,
        game_id: &str,
        patch: &EntryPatch,
    ) -> Result<(), LibraryError> {
        self.merge_entry(user_id, game_id, patch)
    }

    async fn delete(&self, user_id: &str, game_id: &str) -> Result<(), LibraryError> {
        self.delete_entry(user_id, game_id)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<LibraryEntry>, LibraryError> {
        self.list_entries(user_id)
    }
}
