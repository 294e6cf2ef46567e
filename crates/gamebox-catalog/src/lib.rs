//! Game catalog access for Gamebox
//!
//! Translates search intent into catalog queries, talks to the external
//! catalog service and normalizes its heterogeneous records into
//! [`CatalogGame`] values ready to be added to a library.
//!
//! The catalog is a convenience data source, not a system of record: every
//! failure at this boundary degrades to an empty result and a log line.

mod adapter;
mod debounce;
mod fallback;
mod game;
mod igdb;
mod query;
mod record;
mod source;

#[cfg(test)]
mod testing;

pub use adapter::CatalogAdapter;
pub use debounce::{SearchDebouncer, SearchOutcome};
pub use fallback::fallback_games;
pub use game::{CatalogGame, GameStatus, ParseStatusError};
pub use igdb::IgdbSource;
pub use query::{CatalogQuery, CatalogRequest, sanitize_query};
pub use record::{
    InvolvedCompany, NamedRef, RawCover, RawGame, normalize, normalize_cover_url,
    resolve_companies, scale_rating,
};
pub use source::CatalogSource;

use thiserror::Error;

/// Maximum number of records returned for a free-text search
pub const SEARCH_LIMIT: usize = 12;

/// Maximum number of records returned for the top-rated listing
pub const TOP_RATED_LIMIT: usize = 30;

/// Minimum query length (in characters) that reaches the catalog
pub const MIN_QUERY_LEN: usize = 2;

/// Sentinel used when a company cannot be resolved
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog credentials are not configured")]
    MissingCredentials,

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
