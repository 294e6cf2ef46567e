//! Normalized catalog game and play status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a game sits in a player's library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    /// Currently being played
    Playing,
    /// Wishlisted / not started
    #[default]
    Backlog,
    /// Finished
    Completed,
    /// Abandoned
    Dropped,
}

impl GameStatus {
    pub const ALL: [GameStatus; 4] = [
        GameStatus::Playing,
        GameStatus::Backlog,
        GameStatus::Completed,
        GameStatus::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "PLAYING",
            GameStatus::Backlog => "BACKLOG",
            GameStatus::Completed => "COMPLETED",
            GameStatus::Dropped => "DROPPED",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown game status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for GameStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A catalog record after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogGame {
    pub id: String,
    pub title: String,
    pub cover_url: String,
    /// 0.0 - 5.0, one decimal
    pub rating: f32,
    pub release_year: i32,
    pub developer: String,
    pub publisher: String,
    pub description: String,
    pub platforms: Vec<String>,
    /// Platform pre-selected when the game is added
    pub played_on: String,
    pub status: GameStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_text() {
        for status in GameStatus::ALL {
            assert_eq!(status.as_str().parse::<GameStatus>(), Ok(status));
        }
        assert_eq!("playing".parse::<GameStatus>(), Ok(GameStatus::Playing));
        assert!("finished".parse::<GameStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_upper_case() {
        let json = serde_json::to_string(&GameStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
        assert_eq!(GameStatus::default(), GameStatus::Backlog);
    }
}
