//! Static catalog snippet shown when the live landing fetch fails

use crate::{CatalogGame, GameStatus};

struct FallbackEntry {
    id: &'static str,
    title: &'static str,
    cover: &'static str,
    year: i32,
    developer: &'static str,
    publisher: &'static str,
    status: GameStatus,
    rating: f32,
    description: &'static str,
}

const COVER_BASE: &str = "https://images.igdb.com/igdb/image/upload";

const FALLBACK: [FallbackEntry; 6] = [
    FallbackEntry {
        id: "f1",
        title: "Cyberpunk 2077",
        cover: "t_cover_big/coaih8.jpg",
        year: 2020,
        developer: "CD Projekt RED",
        publisher: "CDPR",
        status: GameStatus::Completed,
        rating: 4.5,
        description: "An open-world, action-adventure RPG set in the dark future of Night City.",
    },
    FallbackEntry {
        id: "f2",
        title: "Alan Wake 2",
        cover: "t_cover_big/co6jar.jpg",
        year: 2023,
        developer: "Remedy",
        publisher: "Epic Games",
        status: GameStatus::Playing,
        rating: 5.0,
        description: "Saga Anderson arrives to investigate ritualistic murders in Bright Falls.",
    },
    FallbackEntry {
        id: "f3",
        title: "Silent Hill 2",
        cover: "t_cover_big/coavaf.jpg",
        year: 2024,
        developer: "Bloober Team",
        publisher: "Konami",
        status: GameStatus::Backlog,
        rating: 4.8,
        description: "James Sunderland travels to Silent Hill after receiving a letter from his deceased wife.",
    },
    FallbackEntry {
        id: "f4",
        title: "Elden Ring",
        cover: "t_720p/co4jni.jpg",
        year: 2022,
        developer: "FromSoftware",
        publisher: "Bandai",
        status: GameStatus::Completed,
        rating: 5.0,
        description: "Rise, Tarnished, and be guided by grace to brandish the power of the Elden Ring.",
    },
    FallbackEntry {
        id: "f5",
        title: "Baldur's Gate 3",
        cover: "t_720p/co670h.jpg",
        year: 2023,
        developer: "Larian",
        publisher: "Larian",
        status: GameStatus::Completed,
        rating: 5.0,
        description: "Gather your party and return to the Forgotten Realms.",
    },
    FallbackEntry {
        id: "f6",
        title: "Resident Evil 4",
        cover: "t_cover_big/co6bo0.jpg",
        year: 2023,
        developer: "Capcom",
        publisher: "Capcom",
        status: GameStatus::Completed,
        rating: 4.9,
        description: "Survival is just the beginning. Six years have passed since the biological disaster in Raccoon City.",
    },
];

/// The fixed landing snippet
pub fn fallback_games() -> Vec<CatalogGame> {
    FALLBACK
        .iter()
        .map(|entry| CatalogGame {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            cover_url: format!("{}/{}", COVER_BASE, entry.cover),
            rating: entry.rating,
            release_year: entry.year,
            developer: entry.developer.to_string(),
            publisher: entry.publisher.to_string(),
            description: entry.description.to_string(),
            platforms: Vec::new(),
            played_on: "PC".to_string(),
            status: entry.status,
        })
        .collect()
}
