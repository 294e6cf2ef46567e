//! Sorting and filtering of library entries

use crate::{GameStatus, LibraryEntry};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order for library listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recently added first
    #[default]
    AddedDesc,
    /// Highest rated first
    RatingDesc,
    /// Title, case-insensitive
    Alphabetical,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "added" | "recent" => Ok(Self::AddedDesc),
            "rating" => Ok(Self::RatingDesc),
            "title" | "alpha" | "alphabetical" => Ok(Self::Alphabetical),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Subset of the library to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LibraryView {
    #[default]
    All,
    /// Games being played or finished
    Collection,
    /// Games saved for later
    Wishlist,
}

impl LibraryView {
    pub fn includes(&self, entry: &LibraryEntry) -> bool {
        match self {
            Self::All => true,
            Self::Collection => !matches!(entry.status, GameStatus::Backlog | GameStatus::Dropped),
            Self::Wishlist => entry.status == GameStatus::Backlog,
        }
    }
}

impl FromStr for LibraryView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "collection" => Ok(Self::Collection),
            "wishlist" => Ok(Self::Wishlist),
            other => Err(format!("unknown view: {}", other)),
        }
    }
}

impl fmt::Display for LibraryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Collection => "collection",
            Self::Wishlist => "wishlist",
        };
        f.write_str(name)
    }
}

fn compare(order: SortOrder, a: &LibraryEntry, b: &LibraryEntry) -> Ordering {
    match order {
        SortOrder::AddedDesc => b.added_at.cmp(&a.added_at),
        SortOrder::RatingDesc => b.rating.total_cmp(&a.rating),
        SortOrder::Alphabetical => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// Stable sort in place
pub fn sort_entries(entries: &mut [LibraryEntry], order: SortOrder) {
    entries.sort_by(|a, b| compare(order, a, b));
}

/// Entries in `view` whose title contains `filter`, sorted by `order`
pub fn select<'a>(
    entries: &'a [LibraryEntry],
    view: LibraryView,
    filter: Option<&str>,
    order: SortOrder,
) -> Vec<&'a LibraryEntry> {
    let needle = filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty());

    let mut selected: Vec<&LibraryEntry> = entries
        .iter()
        .filter(|entry| view.includes(entry))
        .filter(|entry| match &needle {
            Some(needle) => entry.title.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect();

    selected.sort_by(|a, b| compare(order, a, b));
    selected
}
