//! Debounced interactive search
//!
//! Every keystroke restarts the quiet-period timer; only the last input
//! after a pause reaches the catalog. Outcomes that were overtaken by newer
//! input while in flight are dropped instead of delivered.

use crate::{CatalogAdapter, CatalogGame, CatalogSource};
use gamebox_config::SearchSettings;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Result of one debounced search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Input sequence number this outcome answers
    pub generation: u64,
    pub query: String,
    pub games: Vec<CatalogGame>,
}

pub struct SearchDebouncer<S> {
    adapter: Arc<CatalogAdapter<S>>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
}

impl<S> SearchDebouncer<S>
where
    S: CatalogSource + 'static,
{
    /// Create a debouncer and the receiver its outcomes arrive on
    pub fn new(
        adapter: Arc<CatalogAdapter<S>>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            adapter,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
        };
        (debouncer, rx)
    }

    /// Create a debouncer whose quiet period is `search.debounce_ms`
    pub fn from_settings(
        adapter: Arc<CatalogAdapter<S>>,
        settings: &SearchSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        Self::new(adapter, settings.debounce())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register a new input; returns its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&self, query: impl Into<String>) -> u64 {
        let query = query.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let adapter = Arc::clone(&self.adapter);
        let latest = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            let games = adapter.search(&query).await;

            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!("Discarding stale results for {:?}", query);
                return;
            }

            let _ = tx.send(SearchOutcome {
                generation,
                query,
                games,
            });
        });

        generation
    }

    /// Invalidate any pending or in-flight search
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether `generation` is still the latest input
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl<S> Drop for SearchDebouncer<S> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSource, record};

    fn adapter() -> Arc<CatalogAdapter<MockSource>> {
        Arc::new(CatalogAdapter::new(MockSource::with_records(vec![
            record(1),
            record(2),
        ])))
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_input_searches() {
        let adapter = adapter();
        let (debouncer, mut rx) = SearchDebouncer::new(adapter.clone(), Duration::from_millis(500));

        debouncer.input("ze");
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.input("zel");
        tokio::time::sleep(Duration::from_millis(200)).await;
        let last = debouncer.input("zelda");

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.generation, last);
        assert_eq!(outcome.query, "zelda");
        assert_eq!(outcome.games.len(), 2);
        assert!(debouncer.is_current(outcome.generation));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(adapter.source().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_longer_than_delay_search_each_time() {
        let adapter = adapter();
        let (debouncer, mut rx) = SearchDebouncer::new(adapter.clone(), Duration::from_millis(500));

        debouncer.input("halo");
        let first = rx.recv().await.unwrap();
        debouncer.input("halo 3");
        let second = rx.recv().await.unwrap();

        assert_eq!(first.query, "halo");
        assert_eq!(second.query, "halo 3");
        assert_eq!(adapter.source().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_follows_settings() {
        let adapter = adapter();
        let settings = SearchSettings {
            debounce_ms: 250,
            ..SearchSettings::default()
        };
        let (debouncer, mut rx) = SearchDebouncer::from_settings(adapter.clone(), &settings);
        assert_eq!(debouncer.delay(), Duration::from_millis(250));

        let start = tokio::time::Instant::now();
        debouncer.input("zelda");
        tokio::time::sleep(Duration::from_millis(249)).await;
        assert_eq!(adapter.source().calls(), 0);

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.query, "zelda");
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_pending_search() {
        let adapter = adapter();
        let (debouncer, mut rx) = SearchDebouncer::new(adapter.clone(), Duration::from_millis(500));

        let generation = debouncer.input("metroid");
        debouncer.cancel();
        assert!(!debouncer.is_current(generation));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(adapter.source().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_yields_empty_outcome_without_fetch() {
        let adapter = adapter();
        let (debouncer, mut rx) = SearchDebouncer::new(adapter.clone(), Duration::from_millis(500));

        debouncer.input("m");
        let outcome = rx.recv().await.unwrap();
        assert!(outcome.games.is_empty());
        assert_eq!(adapter.source().calls(), 0);
    }
}
