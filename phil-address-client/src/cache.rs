use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

/// A cached collection. Replaced wholesale on refresh, never mutated.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub data: Arc<Vec<T>>,
    pub created_at: DateTime<Utc>,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            created_at: self.created_at,
        }
    }
}

impl<T> CacheEntry<T> {
    pub fn new(data: Arc<Vec<T>>) -> Self {
        Self {
            data,
            created_at: Utc::now(),
        }
    }

    /// Freshness is judged against the TTL in force now, not the one at insert time.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        Utc::now() - self.created_at < ttl
    }
}

/// Keyed store for one collection type.
///
/// Every `clear` bumps a generation counter so that writers who started before
/// the clear can be told apart from writers who started after it.
pub struct CollectionCache<T> {
    entries: Arc<DashMap<String, CacheEntry<T>>>,
    generation: Arc<AtomicU64>,
}

impl<T> Clone for CollectionCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<T> Default for CollectionCache<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<T> CollectionCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `key`, fresh or not.
    pub fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: &str, data: Arc<Vec<T>>) {
        self.entries.insert(key.to_string(), CacheEntry::new(data));
        debug!("Stored in cache with key: {}", key);
    }

    /// Store only if no `clear` happened since `generation` was read.
    pub fn put_if_current(&self, key: &str, data: Arc<Vec<T>>, generation: u64) -> bool {
        if self.generation() != generation {
            debug!("Discarding result for {} fetched before cache clear", key);
            return false;
        }
        self.put(key, data);
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    /// Remove entries older than `ttl`. Returns how many were dropped.
    pub fn evict_expired(&self, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(ttl));
        let evicted = before.saturating_sub(self.entries.len());
        debug!("Evicted {} expired cache entries", evicted);
        evicted
    }
}

/// Key counts per collection, not record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct CacheStats {
    pub regions: usize,
    pub provinces: usize,
    pub cities: usize,
    pub barangays: usize,
    pub pending_requests: usize,
    pub total_cached: usize,
}
