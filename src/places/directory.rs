//! Place directory: cache in front of a provider.
//!
//! Search flow:  Cache → provider (unless offline) → store → result
//!
//! The cache lock is never held across a provider call, so concurrent
//! lookups for different queries do not queue behind one slow request.

use super::cache::PlaceCache;
use super::types::{Place, PlaceError, PlaceSearch, PlaceSource};
use std::sync::Mutex;

pub struct PlaceDirectory<P> {
    provider: P,
    cache: Mutex<PlaceCache>,
    offline: bool,
}

impl<P: PlaceSearch> PlaceDirectory<P> {
    pub fn new(provider: P, cache: PlaceCache) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
            offline: false,
        }
    }

    /// Offline mode: answer from the cache only.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn cached(&self, query: &str) -> Option<Vec<Place>> {
        match self.cache.lock() {
            Ok(cache) => cache.get(query),
            Err(poisoned) => poisoned.into_inner().get(query),
        }
    }

    fn store(&self, query: &str, places: &[Place]) {
        match self.cache.lock() {
            Ok(mut cache) => cache.put(query, places),
            Err(poisoned) => poisoned.into_inner().put(query, places),
        }
    }

    /// Look up `query`, reporting where the answer came from.
    pub fn search_with_source(&self, query: &str) -> Result<(Vec<Place>, PlaceSource), PlaceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlaceError::NoInput);
        }

        if let Some(places) = self.cached(query) {
            tracing::debug!(query, count = places.len(), "place cache hit");
            return Ok((places, PlaceSource::Cache));
        }

        if self.offline {
            return Err(PlaceError::Offline(query.to_string()));
        }

        let places = self.provider.search(query)?;
        self.store(query, &places);
        Ok((places, self.provider.source()))
    }
}

impl<P: PlaceSearch> PlaceSearch for PlaceDirectory<P> {
    fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        self.search_with_source(query).map(|(places, _)| places)
    }

    fn source(&self) -> PlaceSource {
        self.provider.source()
    }
}
