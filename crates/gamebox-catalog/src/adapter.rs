//! Catalog query adapter
//!
//! Front door for everything that reads the catalog. Applies the
//! short-query guard, runs the request through a [`CatalogSource`] and
//! normalizes the answer. The infallible entry points log and swallow
//! errors so callers only ever see "some results" or "no results".

use crate::record::normalize;
use crate::{CatalogError, CatalogGame, CatalogQuery, CatalogSource, MIN_QUERY_LEN, fallback_games};
use chrono::{Datelike, Utc};

pub struct CatalogAdapter<S> {
    source: S,
    min_query_len: usize,
}

impl<S: CatalogSource> CatalogAdapter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            min_query_len: MIN_QUERY_LEN,
        }
    }

    /// Override the minimum query length (never below one character)
    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run a query and normalize the result, surfacing errors
    pub async fn try_query(&self, query: &CatalogQuery) -> Result<Vec<CatalogGame>, CatalogError> {
        let request = query.to_request();
        let raw = self.source.fetch(&request).await?;
        let received = raw.len();
        let current_year = Utc::now().year();

        let games: Vec<CatalogGame> = raw
            .into_iter()
            .filter_map(|record| normalize(record, current_year))
            .take(request.limit)
            .collect();

        if games.len() < received {
            tracing::debug!(
                "Dropped {} catalog records without cover art or over the limit",
                received - games.len()
            );
        }

        Ok(games)
    }

    /// Free-text search, capped at [`crate::SEARCH_LIMIT`] results.
    ///
    /// Inputs shorter than the minimum length return an empty list without
    /// touching the source.
    pub async fn search(&self, input: &str) -> Vec<CatalogGame> {
        let Some(query) = CatalogQuery::search(input, self.min_query_len) else {
            tracing::debug!("Skipping catalog search for short query");
            return Vec::new();
        };

        self.run(&query).await
    }

    /// Top-rated listing, capped at [`crate::TOP_RATED_LIMIT`] results
    pub async fn top_rated(&self) -> Vec<CatalogGame> {
        self.run(&CatalogQuery::TopRated).await
    }

    /// Top-rated listing with the static snippet standing in when the
    /// live fetch produces nothing
    pub async fn landing(&self) -> Vec<CatalogGame> {
        let games = self.top_rated().await;
        if games.is_empty() {
            tracing::info!("Live landing fetch empty, using fallback catalog");
            return fallback_games();
        }
        games
    }

    /// Look up a single record by catalog id
    pub async fn lookup(&self, id: u64) -> Option<CatalogGame> {
        self.run(&CatalogQuery::ById(id)).await.into_iter().next()
    }

    async fn run(&self, query: &CatalogQuery) -> Vec<CatalogGame> {
        match self.try_query(query).await {
            Ok(games) => games,
            Err(CatalogError::MissingCredentials) => {
                tracing::error!(
                    "Catalog credentials missing: set {} and {} or the [catalog] section",
                    gamebox_config::ENV_CLIENT_ID,
                    gamebox_config::ENV_CLIENT_SECRET
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Catalog request failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSource, record, record_without_cover};
    use crate::{SEARCH_LIMIT, TOP_RATED_LIMIT};

    #[tokio::test]
    async fn test_short_query_never_reaches_source() {
        let adapter = CatalogAdapter::new(MockSource::with_records(vec![record(1)]));

        for input in ["", "a", " b ", "\"c\"", "\""] {
            assert!(adapter.search(input).await.is_empty(), "input {:?}", input);
        }
        assert_eq!(adapter.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_search_sanitizes_and_normalizes() {
        let adapter = CatalogAdapter::new(MockSource::with_records(vec![
            record(1),
            record_without_cover(2),
            record(3),
        ]));

        let games = adapter.search(r#"mass "effect""#).await;

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, "1");
        assert_eq!(games[1].id, "3");
        assert!(games.iter().all(|g| g.cover_url.starts_with("https://")));

        let bodies = adapter.source().bodies();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].contains("search \"mass effect\";"));
    }

    #[tokio::test]
    async fn test_search_is_capped() {
        let records = (0..40).map(record).collect();
        let adapter = CatalogAdapter::new(MockSource::with_records(records));

        assert_eq!(adapter.search("doom").await.len(), SEARCH_LIMIT);
        assert_eq!(adapter.top_rated().await.len(), TOP_RATED_LIMIT);
    }

    #[tokio::test]
    async fn test_errors_degrade_to_empty() {
        let adapter = CatalogAdapter::new(MockSource::failing());
        assert!(adapter.search("portal").await.is_empty());
        assert!(adapter.top_rated().await.is_empty());
        assert!(adapter.lookup(42).await.is_none());
        assert_eq!(adapter.source().calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_credentials_degrade_to_empty() {
        let adapter = CatalogAdapter::new(MockSource::unconfigured());
        assert!(adapter.search("portal").await.is_empty());
        assert!(matches!(
            adapter.try_query(&CatalogQuery::TopRated).await,
            Err(CatalogError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_landing_uses_fallback_on_failure() {
        let adapter = CatalogAdapter::new(MockSource::failing());
        let games = adapter.landing().await;
        assert_eq!(games, fallback_games());
        assert!(!games.is_empty());
    }

    #[tokio::test]
    async fn test_landing_prefers_live_results() {
        let adapter = CatalogAdapter::new(MockSource::with_records(vec![record(9)]));
        let games = adapter.landing().await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "9");
    }

    #[tokio::test]
    async fn test_lookup_returns_first_record() {
        let adapter = CatalogAdapter::new(MockSource::with_records(vec![record(77)]));
        let game = adapter.lookup(77).await.unwrap();
        assert_eq!(game.id, "77");
        assert!(adapter.source().bodies()[0].contains("where id = 77;"));
    }

    #[tokio::test]
    async fn test_min_query_len_override() {
        let adapter =
            CatalogAdapter::new(MockSource::with_records(vec![record(1)])).with_min_query_len(4);
        assert!(adapter.search("abc").await.is_empty());
        assert_eq!(adapter.search("abcd").await.len(), 1);
        assert_eq!(adapter.source().calls(), 1);
    }
}
