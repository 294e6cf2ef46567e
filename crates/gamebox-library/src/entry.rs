//! Library entries and partial updates

use chrono::{NaiveDate, Utc};
use gamebox_catalog::{CatalogGame, GameStatus};
use serde::{Deserialize, Serialize};

/// Durable document id for a user's copy of a catalog game
pub fn composite_key(user_id: &str, game_id: &str) -> String {
    format!("{}_{}", user_id, game_id)
}

/// Clamp to 0.0-5.0 and round to the nearest half point
pub fn snap_rating(rating: f32) -> f32 {
    if !rating.is_finite() {
        return 0.0;
    }
    ((rating * 2.0).round() / 2.0).clamp(0.0, 5.0)
}

/// Current time as unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A game in a user's library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// Catalog id
    pub id: String,
    pub title: String,
    pub cover_url: String,
    /// 0.0 - 5.0 in half points
    pub rating: f32,
    pub status: GameStatus,
    /// Platform the user plays on
    pub played_on: String,
    pub user_review: String,
    pub completed_at: Option<NaiveDate>,
    /// Unix milliseconds
    pub added_at: i64,
    pub developer: String,
    pub publisher: String,
    pub description: String,
    pub release_year: i32,
}

impl LibraryEntry {
    /// Build a new entry from a catalog record
    pub fn from_catalog(game: &CatalogGame, status: GameStatus, added_at: i64) -> Self {
        Self {
            id: game.id.clone(),
            title: game.title.clone(),
            cover_url: game.cover_url.clone(),
            rating: snap_rating(game.rating),
            status,
            played_on: game.played_on.clone(),
            user_review: String::new(),
            completed_at: None,
            added_at,
            developer: game.developer.clone(),
            publisher: game.publisher.clone(),
            description: game.description.clone(),
            release_year: game.release_year,
        }
    }

    /// Merge a patch into this entry
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(rating) = patch.rating {
            self.rating = snap_rating(rating);
        }
        if let Some(review) = &patch.user_review {
            self.user_review = review.clone();
        }
        if let Some(played_on) = &patch.played_on {
            self.played_on = played_on.clone();
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
    }

    pub fn has_review(&self) -> bool {
        !self.user_review.trim().is_empty()
    }
}

/// User-editable fields of an entry; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub status: Option<GameStatus>,
    pub rating: Option<f32>,
    pub user_review: Option<String>,
    pub played_on: Option<String>,
    /// `Some(None)` clears the completion date
    pub completed_at: Option<Option<NaiveDate>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.rating.is_none()
            && self.user_review.is_none()
            && self.played_on.is_none()
            && self.completed_at.is_none()
    }

    pub fn status(mut self, status: GameStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn review(mut self, review: impl Into<String>) -> Self {
        self.user_review = Some(review.into());
        self
    }

    pub fn played_on(mut self, platform: impl Into<String>) -> Self {
        self.played_on = Some(platform.into());
        self
    }

    pub fn completed_at(mut self, date: Option<NaiveDate>) -> Self {
        self.completed_at = Some(date);
        self
    }

    /// Same patch with the rating snapped to what will be stored
    pub(crate) fn normalized(mut self) -> Self {
        self.rating = self.rating.map(snap_rating);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_game(id: &str) -> CatalogGame {
        CatalogGame {
            id: id.to_string(),
            title: format!("Game {}", id),
            cover_url: format!("https://covers.example/{}.jpg", id),
            rating: 4.3,
            release_year: 2019,
            developer: "Dev".to_string(),
            publisher: "Pub".to_string(),
            description: "A game.".to_string(),
            platforms: vec!["Nintendo Switch".to_string()],
            played_on: "Nintendo Switch".to_string(),
            status: GameStatus::Backlog,
        }
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("u1", "g1"), "u1_g1");
        assert_eq!(composite_key("u1", "g1"), composite_key("u1", "g1"));
        assert_ne!(composite_key("u1", "g1"), composite_key("u2", "g1"));
    }

    #[test]
    fn test_snap_rating() {
        assert_eq!(snap_rating(4.3), 4.5);
        assert_eq!(snap_rating(4.2), 4.0);
        assert_eq!(snap_rating(3.5), 3.5);
        assert_eq!(snap_rating(7.0), 5.0);
        assert_eq!(snap_rating(-1.0), 0.0);
        assert_eq!(snap_rating(f32::NAN), 0.0);
    }

    #[test]
    fn test_from_catalog() {
        let entry = LibraryEntry::from_catalog(&catalog_game("42"), GameStatus::Playing, 1_000);
        assert_eq!(entry.id, "42");
        assert_eq!(entry.status, GameStatus::Playing);
        assert_eq!(entry.rating, 4.5);
        assert_eq!(entry.added_at, 1_000);
        assert_eq!(entry.played_on, "Nintendo Switch");
        assert!(entry.user_review.is_empty());
        assert!(entry.completed_at.is_none());
    }

    #[test]
    fn test_apply_patch() {
        let mut entry = LibraryEntry::from_catalog(&catalog_game("1"), GameStatus::Playing, 0);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        entry.apply(
            &EntryPatch::default()
                .status(GameStatus::Completed)
                .rating(3.7)
                .review("Loved it")
                .completed_at(Some(date)),
        );

        assert_eq!(entry.status, GameStatus::Completed);
        assert_eq!(entry.rating, 3.5);
        assert_eq!(entry.user_review, "Loved it");
        assert_eq!(entry.completed_at, Some(date));
        assert_eq!(entry.played_on, "Nintendo Switch");

        entry.apply(&EntryPatch::default().completed_at(None));
        assert_eq!(entry.completed_at, None);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(EntryPatch::default().is_empty());
        assert!(!EntryPatch::default().played_on("PC").is_empty());
        assert!(!EntryPatch::default().completed_at(None).is_empty());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = LibraryEntry::from_catalog(&catalog_game("5"), GameStatus::Backlog, 7);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["coverUrl"], "https://covers.example/5.jpg");
        assert_eq!(json["status"], "BACKLOG");
        assert_eq!(json["addedAt"], 7);
    }
}
