//! In-memory catalog source for tests

use crate::record::{NamedRef, RawCover};
use crate::{CatalogError, CatalogRequest, CatalogSource, InvolvedCompany, RawGame};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Behavior {
    Records(Vec<RawGame>),
    Fail,
    Unconfigured,
}

/// Counts calls, records request bodies and answers with canned data
pub struct MockSource {
    behavior: Behavior,
    calls: AtomicUsize,
    bodies: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn with_records(records: Vec<RawGame>) -> Self {
        Self::new(Behavior::Records(records))
    }

    pub fn failing() -> Self {
        Self::new(Behavior::Fail)
    }

    pub fn unconfigured() -> Self {
        Self::new(Behavior::Unconfigured)
    }

    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

impl CatalogSource for MockSource {
    async fn fetch(&self, request: &CatalogRequest) -> Result<Vec<RawGame>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push(request.body.clone());

        match &self.behavior {
            Behavior::Records(records) => Ok(records.clone()),
            Behavior::Fail => Err(CatalogError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
            Behavior::Unconfigured => Err(CatalogError::MissingCredentials),
        }
    }
}

pub fn record(id: u64) -> RawGame {
    RawGame {
        id,
        name: Some(format!("Game {}", id)),
        first_release_date: Some(1_600_000_000),
        cover: Some(RawCover {
            url: Some(format!("//images.igdb.com/igdb/image/upload/t_thumb/co{}.jpg", id)),
        }),
        total_rating: Some(80.0),
        platforms: Some(vec![NamedRef {
            name: Some("PlayStation 5".to_string()),
        }]),
        involved_companies: Some(vec![InvolvedCompany::developer("Studio")]),
        ..Default::default()
    }
}

pub fn record_without_cover(id: u64) -> RawGame {
    RawGame {
        cover: None,
        ..record(id)
    }
}
