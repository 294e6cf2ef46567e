//! Game library management for Gamebox
//!
//! Keeps each user's collection of [`LibraryEntry`] values in a durable
//! store and mirrors it in memory with optimistic local mutation.
//! One entry exists per (user, catalog game) pair, keyed by
//! [`composite_key`].

mod database;
mod entry;
mod stats;
mod store;
mod sync;
mod view;

pub use database::SqliteStore;
pub use entry::{EntryPatch, LibraryEntry, composite_key, now_millis, snap_rating};
pub use gamebox_catalog::GameStatus;
pub use stats::{PlatformShare, ProfileStats, normalize_platform};
pub use store::LibraryStore;
pub use sync::LibrarySync;
pub use view::{LibraryView, SortOrder, select, sort_entries};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
