use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use crate::config::CacheConfig;
use crate::dispatch::strategy::Strategy;
use crate::extractor::ExtractionResult;

/// Cache lookups happen before any I/O, so requests are keyed by their own
/// URL. Document results are also stored under the URL they were finally
/// read from (after redirects or a followed frame), so asking for that
/// location directly hits the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Canonical document location for fetch-based extractions.
    Document(String),
    /// Canonical post URL for external-job extractions.
    Job(String),
}

impl CacheKey {
    pub fn for_request(strategy: &Strategy, url: &Url) -> Self {
        let canonical = canonical_url(url);
        if strategy.is_external_job() {
            Self::Job(canonical)
        } else {
            Self::Document(canonical)
        }
    }
}

/// `url` without its fragment; scheme and host are already lowercased by
/// the parser.
pub fn canonical_url(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical.to_string()
}

#[derive(Debug)]
struct CacheEntry {
    result: ExtractionResult,
    inserted_at: Instant,
}

/// Process-wide result cache with TTL expiry and a size bound.
///
/// Safe for concurrent reads and inserts. When full, expired entries are
/// purged first and then the oldest entry is evicted.
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: config.ttl,
            max_entries: config.max_entries,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<ExtractionResult> {
        // Expired entries are dropped on read.
        self.entries
            .remove_if(key, |_, entry| entry.inserted_at.elapsed() >= self.ttl);

        let hit = self.entries.get(key).map(|entry| entry.result.clone());
        if hit.is_some() {
            debug!(?key, "Cache hit");
        }
        hit
    }

    pub fn insert(&self, key: CacheKey, result: ExtractionResult) {
        if self.max_entries == 0 {
            return;
        }

        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict();
        }

        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    fn evict(&self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        if self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.inserted_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            debug!(?key, "Evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
