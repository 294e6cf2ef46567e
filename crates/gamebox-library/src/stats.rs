//! Profile statistics derived from a user's library

use crate::{GameStatus, LibraryEntry};
use chrono::{DateTime, Datelike};

const FAVORITES: usize = 4;
const TOP_PLATFORMS: usize = 4;
const RECENT_ACTIVITY: usize = 5;
const HISTOGRAM_BINS: usize = 10;

/// Map store platform names onto the short labels shown on a profile
pub fn normalize_platform(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "Unknown".to_string();
    }

    let label = if raw.contains("PlayStation 5") || raw == "PS5" {
        "PS5"
    } else if raw.contains("PlayStation 4") || raw == "PS4" {
        "PS4"
    } else if raw.contains("Xbox Series") || raw.contains("Series X") {
        "Xbox Series"
    } else if raw.contains("Switch") {
        "Nintendo Switch"
    } else if raw.contains("PC") || raw.contains("Windows") {
        "PC"
    } else {
        raw
    };

    label.to_string()
}

/// How many collection games were played on one platform
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformShare {
    pub name: String,
    pub count: usize,
    /// Whole percent of the collection
    pub percent: u32,
}

/// Summary figures for a profile page.
///
/// `wishlist` holds BACKLOG entries; every other figure is computed over
/// the collection (all non-BACKLOG entries).
#[derive(Debug, Clone)]
pub struct ProfileStats<'a> {
    pub wishlist: Vec<&'a LibraryEntry>,
    pub collection: Vec<&'a LibraryEntry>,
    pub total: usize,
    /// Collection entries added during `current_year`
    pub this_year: usize,
    pub favorites: Vec<&'a LibraryEntry>,
    /// Bin `i` counts ratings in `(i/2, (i+1)/2]`; unrated games are skipped
    pub ratings_histogram: [usize; HISTOGRAM_BINS],
    /// Largest histogram bin, never below 1
    pub max_rating_count: usize,
    pub top_platforms: Vec<PlatformShare>,
    pub recent_activity: Vec<&'a LibraryEntry>,
    pub reviews: Vec<&'a LibraryEntry>,
}

impl<'a> ProfileStats<'a> {
    pub fn compute(entries: &'a [LibraryEntry], current_year: i32) -> Self {
        let (wishlist, collection): (Vec<&LibraryEntry>, Vec<&LibraryEntry>) = entries
            .iter()
            .partition(|entry| entry.status == GameStatus::Backlog);
        let total = collection.len();

        let this_year = collection
            .iter()
            .filter(|entry| {
                DateTime::from_timestamp_millis(entry.added_at)
                    .is_some_and(|added| added.year() == current_year)
            })
            .count();

        let mut favorites = collection.clone();
        favorites.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        favorites.truncate(FAVORITES);

        let mut ratings_histogram = [0usize; HISTOGRAM_BINS];
        for entry in &collection {
            if let Some(bin) = rating_bin(entry.rating) {
                ratings_histogram[bin] += 1;
            }
        }
        let max_rating_count = ratings_histogram.iter().copied().max().unwrap_or(0).max(1);

        let top_platforms = platform_shares(&collection);

        let mut recent_activity = collection.clone();
        recent_activity.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        recent_activity.truncate(RECENT_ACTIVITY);

        let reviews = collection
            .iter()
            .copied()
            .filter(|entry| entry.has_review())
            .collect();

        Self {
            wishlist,
            collection,
            total,
            this_year,
            favorites,
            ratings_histogram,
            max_rating_count,
            top_platforms,
            recent_activity,
            reviews,
        }
    }
}

fn rating_bin(rating: f32) -> Option<usize> {
    if rating.is_nan() || rating <= 0.0 {
        return None;
    }
    let index = (rating * 2.0).ceil() as i64 - 1;
    usize::try_from(index).ok().filter(|i| *i < HISTOGRAM_BINS)
}

fn platform_shares(collection: &[&LibraryEntry]) -> Vec<PlatformShare> {
    // First-seen order breaks count ties
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in collection {
        let name = normalize_platform(&entry.played_on);
        match counts.iter_mut().find(|(seen, _)| *seen == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = collection.len().max(1) as f64;
    counts
        .into_iter()
        .take(TOP_PLATFORMS)
        .map(|(name, count)| PlatformShare {
            name,
            count,
            percent: ((count as f64 / total) * 100.0).round() as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn millis(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn entry(id: &str, rating: f32, status: GameStatus, played_on: &str, added_at: i64) -> LibraryEntry {
        LibraryEntry {
            id: id.to_string(),
            title: format!("Game {}", id),
            cover_url: String::new(),
            rating,
            status,
            played_on: played_on.to_string(),
            user_review: String::new(),
            completed_at: None,
            added_at,
            developer: String::new(),
            publisher: String::new(),
            description: String::new(),
            release_year: 2020,
        }
    }

    fn ids(entries: &[&LibraryEntry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_normalize_platform() {
        assert_eq!(normalize_platform("PlayStation 5"), "PS5");
        assert_eq!(normalize_platform("PS4"), "PS4");
        assert_eq!(normalize_platform("Xbox Series X|S"), "Xbox Series");
        assert_eq!(normalize_platform("Nintendo Switch"), "Nintendo Switch");
        assert_eq!(normalize_platform("PC (Microsoft Windows)"), "PC");
        assert_eq!(normalize_platform("Steam Deck"), "Steam Deck");
        assert_eq!(normalize_platform("  "), "Unknown");
    }

    #[test]
    fn test_rating_bin() {
        assert_eq!(rating_bin(0.0), None);
        assert_eq!(rating_bin(0.5), Some(0));
        assert_eq!(rating_bin(0.7), Some(1));
        assert_eq!(rating_bin(4.5), Some(8));
        assert_eq!(rating_bin(5.0), Some(9));
        assert_eq!(rating_bin(f32::NAN), None);
    }

    #[test]
    fn test_empty_library() {
        let stats = ProfileStats::compute(&[], 2024);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.max_rating_count, 1);
        assert!(stats.top_platforms.is_empty());
        assert!(stats.favorites.is_empty());
    }

    #[test]
    fn test_compute() {
        let mut reviewed = entry("r", 3.0, GameStatus::Completed, "PlayStation 5", millis(2023, 5, 1));
        reviewed.user_review = "Solid".to_string();

        let entries = vec![
            entry("a", 5.0, GameStatus::Playing, "PC (Microsoft Windows)", millis(2024, 1, 2)),
            entry("b", 4.5, GameStatus::Completed, "PlayStation 5", millis(2024, 3, 4)),
            entry("w", 5.0, GameStatus::Backlog, "PC", millis(2024, 6, 1)),
            entry("d", 0.0, GameStatus::Dropped, "PS5", millis(2022, 1, 1)),
            reviewed,
            entry("s", 2.0, GameStatus::Playing, "Nintendo Switch", millis(2024, 2, 1)),
        ];

        let stats = ProfileStats::compute(&entries, 2024);

        assert_eq!(ids(&stats.wishlist), vec!["w"]);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.this_year, 3);
        assert_eq!(ids(&stats.favorites), vec!["a", "b", "r", "s"]);

        let mut histogram = [0usize; 10];
        histogram[9] = 1;
        histogram[8] = 1;
        histogram[5] = 1;
        histogram[3] = 1;
        assert_eq!(stats.ratings_histogram, histogram);
        assert_eq!(stats.max_rating_count, 1);

        assert_eq!(
            stats.top_platforms[0],
            PlatformShare {
                name: "PS5".to_string(),
                count: 3,
                percent: 60
            }
        );
        assert_eq!(stats.top_platforms[1].name, "PC");
        assert_eq!(stats.top_platforms[1].percent, 20);
        assert_eq!(stats.top_platforms.len(), 3);

        assert_eq!(ids(&stats.recent_activity), vec!["b", "s", "a", "r", "d"]);
        assert_eq!(ids(&stats.reviews), vec!["r"]);
    }
}
