//! In-memory library mirror with optimistic writes
//!
//! Every mutation is applied to the local list first, then written to the
//! durable store. A mutation yields its own inverse; if the durable write
//! fails the inverse is applied, so the local list ends up exactly as it
//! was before the call.

use crate::{
    EntryPatch, GameStatus, LibraryEntry, LibraryError, LibraryStore, LibraryView, ProfileStats,
    SortOrder, now_millis, select, sort_entries,
};
use gamebox_catalog::CatalogGame;

/// A reversible edit of the local entry list
#[derive(Debug)]
enum LocalMutation {
    Insert { index: usize, entry: LibraryEntry },
    Remove { index: usize },
    Replace { index: usize, entry: LibraryEntry },
    Batch(Vec<LocalMutation>),
}

impl LocalMutation {
    /// Apply to `entries` and return the mutation that undoes it
    fn apply(self, entries: &mut Vec<LibraryEntry>) -> LocalMutation {
        match self {
            Self::Insert { index, entry } => {
                entries.insert(index, entry);
                Self::Remove { index }
            }
            Self::Remove { index } => {
                let entry = entries.remove(index);
                Self::Insert { index, entry }
            }
            Self::Replace { index, entry } => {
                let previous = std::mem::replace(&mut entries[index], entry);
                Self::Replace {
                    index,
                    entry: previous,
                }
            }
            Self::Batch(steps) => {
                let mut inverse: Vec<LocalMutation> =
                    steps.into_iter().map(|step| step.apply(entries)).collect();
                inverse.reverse();
                Self::Batch(inverse)
            }
        }
    }
}

/// One user's library, mirrored locally and persisted through a [`LibraryStore`]
pub struct LibrarySync<S> {
    store: S,
    user_id: String,
    entries: Vec<LibraryEntry>,
}

impl<S: LibraryStore> LibrarySync<S> {
    /// Create an empty mirror; call [`LibrarySync::load`] to fill it
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Local entries, most recently added first after a load
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn get(&self, game_id: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|entry| entry.id == game_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the user's entries from the durable store, newest first.
    ///
    /// Does not touch the local list.
    pub async fn list(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        let mut entries = self.store.list(&self.user_id).await?;
        sort_entries(&mut entries, SortOrder::AddedDesc);
        Ok(entries)
    }

    /// Replace the local list with the durable one
    pub async fn load(&mut self) -> Result<&[LibraryEntry], LibraryError> {
        let entries = self.list().await.inspect_err(|e| {
            tracing::error!("Failed to load library for {}: {}", self.user_id, e);
        })?;

        tracing::debug!("Loaded {} entries for {}", entries.len(), self.user_id);
        self.entries = entries;
        Ok(&self.entries)
    }

    /// Add an entry at the head of the list.
    ///
    /// An existing entry for the same game is replaced. Returns the stored
    /// entry, whose `added_at` comes from the store.
    pub async fn add(&mut self, entry: LibraryEntry) -> Result<LibraryEntry, LibraryError> {
        if entry.id.trim().is_empty() {
            return Err(LibraryError::InvalidEntry("entry has no game id".to_string()));
        }

        let game_id = entry.id.clone();
        let insert = LocalMutation::Insert {
            index: 0,
            entry: entry.clone(),
        };
        let mutation = match self.position(&game_id) {
            Some(index) => LocalMutation::Batch(vec![LocalMutation::Remove { index }, insert]),
            None => insert,
        };
        let inverse = mutation.apply(&mut self.entries);

        let result = self.store.put(&self.user_id, &entry).await;
        let stored = self.settle(inverse, result, "add", &game_id)?;

        if let Some(local) = self.entries.first_mut() {
            local.added_at = stored.added_at;
        }

        tracing::info!("Added {} ({}) as {}", stored.title, stored.id, stored.status);
        Ok(stored)
    }

    /// Add a catalog game with the given status
    pub async fn add_game(
        &mut self,
        game: &CatalogGame,
        status: GameStatus,
    ) -> Result<LibraryEntry, LibraryError> {
        self.add(LibraryEntry::from_catalog(game, status, now_millis()))
            .await
    }

    /// Merge `patch` into an entry held locally
    pub async fn update(&mut self, game_id: &str, patch: EntryPatch) -> Result<(), LibraryError> {
        let patch = patch.normalized();
        if patch.is_empty() {
            return Ok(());
        }

        let index = self
            .position(game_id)
            .ok_or_else(|| LibraryError::EntryNotFound(game_id.to_string()))?;

        let mut updated = self.entries[index].clone();
        updated.apply(&patch);
        let inverse = LocalMutation::Replace {
            index,
            entry: updated,
        }
        .apply(&mut self.entries);

        let result = self.store.merge(&self.user_id, game_id, &patch).await;
        self.settle(inverse, result, "update", game_id)?;

        tracing::debug!("Updated {}", game_id);
        Ok(())
    }

    /// Remove an entry.
    ///
    /// The durable delete is issued even when the entry is not held locally.
    pub async fn remove(&mut self, game_id: &str) -> Result<(), LibraryError> {
        let inverse = match self.position(game_id) {
            Some(index) => LocalMutation::Remove { index }.apply(&mut self.entries),
            None => LocalMutation::Batch(Vec::new()),
        };

        let result = self.store.delete(&self.user_id, game_id).await;
        self.settle(inverse, result, "remove", game_id)?;

        tracing::info!("Removed {}", game_id);
        Ok(())
    }

    /// Local entries in `view` matching `filter`, sorted by `order`
    pub fn select(
        &self,
        view: LibraryView,
        filter: Option<&str>,
        order: SortOrder,
    ) -> Vec<&LibraryEntry> {
        select(&self.entries, view, filter, order)
    }

    pub fn stats(&self, current_year: i32) -> ProfileStats<'_> {
        ProfileStats::compute(&self.entries, current_year)
    }

    fn position(&self, game_id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == game_id)
    }

    /// Keep the local mutation on success, undo it on failure
    fn settle<T>(
        &mut self,
        inverse: LocalMutation,
        result: Result<T, LibraryError>,
        action: &str,
        game_id: &str,
    ) -> Result<T, LibraryError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!("Failed to {} {}: {}", action, game_id, e);
                inverse.apply(&mut self.entries);
                Err(e)
            }
        }
    }
}
