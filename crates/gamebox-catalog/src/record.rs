//! Raw catalog records and their normalization

use crate::{CatalogGame, GameStatus, UNKNOWN};
use chrono::{DateTime, Datelike};
use serde::Deserialize;

const THUMB_SEGMENT: &str = "t_thumb";
const HIGH_RES_SEGMENT: &str = "t_720p";
const DEFAULT_PLATFORM: &str = "PC";
const NO_DESCRIPTION: &str = "No description available.";
const UNTITLED: &str = "Untitled";

/// A game record exactly as the catalog returns it.
///
/// The catalog omits any field it has no value for, so everything beyond
/// the id is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGame {
    pub id: u64,
    pub name: Option<String>,
    /// Unix timestamp in seconds
    pub first_release_date: Option<i64>,
    pub cover: Option<RawCover>,
    /// Aggregated critic + user rating, 0-100
    pub total_rating: Option<f64>,
    /// User rating, 0-100
    pub rating: Option<f64>,
    pub platforms: Option<Vec<NamedRef>>,
    pub summary: Option<String>,
    pub involved_companies: Option<Vec<InvolvedCompany>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCover {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

/// A company credited on a game
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvolvedCompany {
    #[serde(default)]
    pub developer: bool,
    #[serde(default)]
    pub publisher: bool,
    pub company: Option<NamedRef>,
}

impl InvolvedCompany {
    pub fn developer(name: &str) -> Self {
        Self {
            developer: true,
            publisher: false,
            company: Some(NamedRef {
                name: Some(name.to_string()),
            }),
        }
    }

    pub fn publisher(name: &str) -> Self {
        Self {
            developer: false,
            publisher: true,
            company: Some(NamedRef {
                name: Some(name.to_string()),
            }),
        }
    }

    fn name(&self) -> Option<&str> {
        self.company
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .filter(|n| !n.trim().is_empty())
    }
}

/// Resolve `(developer, publisher)` from the credited companies.
///
/// A game with a developer but no publisher is treated as self-published.
pub fn resolve_companies(companies: &[InvolvedCompany]) -> (String, String) {
    let developer = companies
        .iter()
        .filter(|c| c.developer)
        .find_map(InvolvedCompany::name);
    let publisher = companies
        .iter()
        .filter(|c| c.publisher)
        .find_map(InvolvedCompany::name)
        .or(developer);

    (
        developer.unwrap_or(UNKNOWN).to_string(),
        publisher.unwrap_or(UNKNOWN).to_string(),
    )
}

/// Rewrite a thumbnail cover reference into an absolute high-res URL
pub fn normalize_cover_url(url: Option<&str>) -> Option<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    let url = url.replace(THUMB_SEGMENT, HIGH_RES_SEGMENT);

    let absolute = if url.starts_with("//") {
        format!("https:{}", url)
    } else if url.starts_with("https://") || url.starts_with("http://") {
        url
    } else {
        format!("https://{}", url)
    };

    Some(absolute)
}

/// Rescale a 0-100 rating to 0.0-5.0 with one decimal
pub fn scale_rating(raw: Option<f64>) -> f32 {
    match raw.filter(|r| r.is_finite()) {
        // raw / 20 rounded to a tenth == round(raw / 2) / 10
        Some(r) => ((r / 2.0).round() / 10.0).clamp(0.0, 5.0) as f32,
        None => 0.0,
    }
}

fn release_year(timestamp: Option<i64>, current_year: i32) -> i32 {
    timestamp
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.year())
        .unwrap_or(current_year)
}

/// Normalize one raw record.
///
/// Returns `None` for records without a usable cover, which downstream
/// display cannot handle.
pub fn normalize(raw: RawGame, current_year: i32) -> Option<CatalogGame> {
    let cover_url = normalize_cover_url(raw.cover.as_ref().and_then(|c| c.url.as_deref()))?;

    let (developer, publisher) =
        resolve_companies(raw.involved_companies.as_deref().unwrap_or_default());

    let platforms: Vec<String> = raw
        .platforms
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.name)
        .filter(|name| !name.trim().is_empty())
        .collect();

    let played_on = platforms
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());

    Some(CatalogGame {
        id: raw.id.to_string(),
        title: raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        cover_url,
        rating: scale_rating(raw.total_rating.or(raw.rating)),
        release_year: release_year(raw.first_release_date, current_year),
        developer,
        publisher,
        description: raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        platforms,
        played_on,
        status: GameStatus::Backlog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_cover(id: u64) -> RawGame {
        RawGame {
            id,
            name: Some(format!("Game {}", id)),
            cover: Some(RawCover {
                url: Some("//images.igdb.com/igdb/image/upload/t_thumb/co1abc.jpg".into()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_rating_examples() {
        assert_eq!(scale_rating(Some(86.0)), 4.3);
        assert_eq!(scale_rating(Some(0.0)), 0.0);
        assert_eq!(scale_rating(Some(100.0)), 5.0);
        assert_eq!(scale_rating(None), 0.0);
        assert_eq!(scale_rating(Some(f64::NAN)), 0.0);
    }

    #[test]
    fn test_rating_monotonic_and_bounded() {
        let mut previous = 0.0_f32;
        for step in 0..=1000 {
            let raw = step as f64 / 10.0;
            let scaled = scale_rating(Some(raw));
            assert!((0.0..=5.0).contains(&scaled), "{} -> {}", raw, scaled);
            assert!(scaled >= previous, "not monotonic at {}", raw);
            previous = scaled;
        }
        // Out-of-range input is clamped
        assert_eq!(scale_rating(Some(140.0)), 5.0);
        assert_eq!(scale_rating(Some(-3.0)), 0.0);
    }

    #[test]
    fn test_developer_only_is_self_published() {
        let (dev, publisher) = resolve_companies(&[InvolvedCompany::developer("A")]);
        assert_eq!(dev, "A");
        assert_eq!(publisher, "A");
    }

    #[test]
    fn test_developer_and_publisher() {
        let (dev, publisher) = resolve_companies(&[
            InvolvedCompany::developer("A"),
            InvolvedCompany::publisher("B"),
        ]);
        assert_eq!(dev, "A");
        assert_eq!(publisher, "B");
    }

    #[test]
    fn test_no_companies_is_unknown() {
        let (dev, publisher) = resolve_companies(&[]);
        assert_eq!(dev, UNKNOWN);
        assert_eq!(publisher, UNKNOWN);
    }

    #[test]
    fn test_publisher_only_keeps_unknown_developer() {
        let (dev, publisher) = resolve_companies(&[InvolvedCompany::publisher("B")]);
        assert_eq!(dev, UNKNOWN);
        assert_eq!(publisher, "B");
    }

    #[test]
    fn test_first_flagged_company_wins() {
        let (dev, publisher) = resolve_companies(&[
            InvolvedCompany::publisher("P1"),
            InvolvedCompany::developer("D1"),
            InvolvedCompany::developer("D2"),
            InvolvedCompany::publisher("P2"),
        ]);
        assert_eq!(dev, "D1");
        assert_eq!(publisher, "P1");
    }

    #[test]
    fn test_cover_url_rewrite() {
        assert_eq!(
            normalize_cover_url(Some("//images.igdb.com/igdb/image/upload/t_thumb/co1.jpg")),
            Some("https://images.igdb.com/igdb/image/upload/t_720p/co1.jpg".to_string())
        );
        assert_eq!(
            normalize_cover_url(Some("https://cdn.example/t_thumb/a.png")),
            Some("https://cdn.example/t_720p/a.png".to_string())
        );
        assert_eq!(normalize_cover_url(Some("   ")), None);
        assert_eq!(normalize_cover_url(None), None);
    }

    #[test]
    fn test_normalize_full_record() {
        let json = r#"{
            "id": 1942,
            "name": "The Witcher 3: Wild Hunt",
            "first_release_date": 1431993600,
            "cover": { "id": 89386, "url": "//images.igdb.com/igdb/image/upload/t_thumb/coaarl.jpg" },
            "total_rating": 93.4,
            "platforms": [{ "id": 6, "name": "PC (Microsoft Windows)" }, { "id": 48, "name": "PlayStation 4" }],
            "summary": "RPG set in a fantasy world.",
            "involved_companies": [
                { "id": 1, "developer": true, "publisher": false, "company": { "id": 908, "name": "CD Projekt RED" } },
                { "id": 2, "developer": false, "publisher": true, "company": { "id": 1, "name": "Warner Bros." } }
            ]
        }"#;
        let raw: RawGame = serde_json::from_str(json).unwrap();
        let game = normalize(raw, 2030).unwrap();

        assert_eq!(game.id, "1942");
        assert_eq!(
            game.cover_url,
            "https://images.igdb.com/igdb/image/upload/t_720p/coaarl.jpg"
        );
        assert_eq!(game.rating, 4.7);
        assert_eq!(game.release_year, 2015);
        assert_eq!(game.developer, "CD Projekt RED");
        assert_eq!(game.publisher, "Warner Bros.");
        assert_eq!(game.played_on, "PC (Microsoft Windows)");
        assert_eq!(game.platforms.len(), 2);
        assert_eq!(game.status, GameStatus::Backlog);
    }

    #[test]
    fn test_normalize_defaults() {
        let game = normalize(raw_with_cover(7), 2031).unwrap();
        assert_eq!(game.release_year, 2031);
        assert_eq!(game.rating, 0.0);
        assert_eq!(game.played_on, "PC");
        assert_eq!(game.description, "No description available.");
        assert_eq!(game.developer, UNKNOWN);
        assert_eq!(game.publisher, UNKNOWN);
    }

    #[test]
    fn test_normalize_drops_missing_cover() {
        let mut raw = raw_with_cover(1);
        raw.cover = None;
        assert!(normalize(raw, 2024).is_none());

        let mut raw = raw_with_cover(2);
        raw.cover = Some(RawCover { url: None });
        assert!(normalize(raw, 2024).is_none());
    }

    #[test]
    fn test_cover_filter_shrinks_list() {
        let mut without_cover = raw_with_cover(3);
        without_cover.cover = None;
        let input = vec![raw_with_cover(1), without_cover, raw_with_cover(2)];
        let before = input.len();

        let output: Vec<_> = input
            .into_iter()
            .filter_map(|raw| normalize(raw, 2024))
            .collect();

        assert!(output.len() < before);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_top_rated_falls_back_to_plain_rating() {
        let mut raw = raw_with_cover(5);
        raw.rating = Some(90.0);
        assert_eq!(normalize(raw, 2024).unwrap().rating, 4.5);
    }
}
