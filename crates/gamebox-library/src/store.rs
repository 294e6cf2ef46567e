//! Durable store abstraction

use crate::{EntryPatch, LibraryEntry, LibraryError};
use std::future::Future;
use std::sync::Arc;

/// Durable per-user document store for library entries.
///
/// Documents are keyed by [`crate::composite_key`]; no ordering is
/// guaranteed by [`LibraryStore::list`].
pub trait LibraryStore: Send + Sync {
    /// Full-document upsert. Returns the stored document, whose `added_at`
    /// is assigned by the store.
    fn put(
        &self,
        user_id: &str,
        entry: &LibraryEntry,
    ) -> impl Future<Output = Result<LibraryEntry, LibraryError>> + Send;

    /// Write only the fields present in `patch`
    fn merge(
        &self,
        user_id: &str,
        game_id: &str,
        patch: &EntryPatch,
    ) -> impl Future<Output = Result<(), LibraryError>> + Send;

    /// Delete a document; deleting a missing document succeeds
    fn delete(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> impl Future<Output = Result<(), LibraryError>> + Send;

    /// All documents owned by `user_id`
    fn list(&self, user_id: &str)
    -> impl Future<Output = Result<Vec<LibraryEntry>, LibraryError>> + Send;
}

impl<S: LibraryStore> LibraryStore for Arc<S> {
    fn put(
        &self,
        user_id: &str,
        entry: &LibraryEntry,
    ) -> impl Future<Output = Result<LibraryEntry, LibraryError>> + Send {
        (**self).put(user_id, entry)
    }

    fn merge(
        &self,
        user_id: &str,
        game_id: &str,
        patch: &EntryPatch,
    ) -> impl Future<Output = Result<(), LibraryError>> + Send {
        (**self).merge(user_id, game_id, patch)
    }

    fn delete(
        &self,
        user_id: &str,
        game_id: &str,
    ) -> impl Future<Output = Result<(), LibraryError>> + Send {
        (**self).delete(user_id, game_id)
    }

    fn list(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<LibraryEntry>, LibraryError>> + Send {
        (**self).list(user_id)
    }
}
