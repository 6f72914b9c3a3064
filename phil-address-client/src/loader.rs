use crate::cache::CollectionCache;
use crate::config::SharedConfig;
use crate::deduplication::RequestDeduplicator;
use crate::error::Error;
use crate::fetcher::ResilientFetcher;
use crate::records::Record;
use log::{debug, error, warn};
use std::sync::Arc;

/// Outcome of a collection load. Loads never fail outward; this records how the data was obtained.
#[derive(Debug)]
pub enum Lookup<T> {
    /// Served from a fresh cache entry or a successful fetch
    Fresh(Arc<Vec<T>>),
    /// The refresh failed and an expired entry was served instead
    Stale { data: Arc<Vec<T>>, error: Arc<Error> },
    /// Nothing to serve
    Empty { error: Arc<Error> },
}

impl<T> Clone for Lookup<T> {
    fn clone(&self) -> Self {
        match self {
            Lookup::Fresh(data) => Lookup::Fresh(Arc::clone(data)),
            Lookup::Stale { data, error } => Lookup::Stale {
                data: Arc::clone(data),
                error: Arc::clone(error),
            },
            Lookup::Empty { error } => Lookup::Empty {
                error: Arc::clone(error),
            },
        }
    }
}

impl<T> Lookup<T> {
    fn empty(error: Error) -> Self {
        Lookup::Empty {
            error: Arc::new(error),
        }
    }

    /// The records served, if any.
    pub fn data(&self) -> &[T] {
        match self {
            Lookup::Fresh(data) | Lookup::Stale { data, .. } => data.as_slice(),
            Lookup::Empty { .. } => &[],
        }
    }

    /// The failure behind a stale or empty outcome.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Lookup::Fresh(_) => None,
            Lookup::Stale { error, .. } | Lookup::Empty { error } => Some(error.as_ref()),
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Lookup::Stale { .. })
    }
}

impl<T: Clone> Lookup<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Lookup::Fresh(data) | Lookup::Stale { data, .. } => {
                Arc::try_unwrap(data).unwrap_or_else(|shared| (*shared).clone())
            }
            Lookup::Empty { .. } => Vec::new(),
        }
    }
}

/// Cache plus in-flight registry for one record type.
pub(crate) struct Collection<T: Record> {
    pub(crate) cache: CollectionCache<T>,
    pub(crate) inflight: RequestDeduplicator<Lookup<T>>,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self {
            cache: CollectionCache::new(),
            inflight: RequestDeduplicator::new(),
        }
    }
}

impl<T: Record> Collection<T> {
    /// Load the collection under `parent_code` (`None` for regions).
    pub(crate) async fn load(
        &self,
        parent_code: Option<&str>,
        base_url: &str,
        fetcher: &ResilientFetcher,
        config: &SharedConfig,
    ) -> Lookup<T> {
        let level = T::LEVEL;
        if let (Some(parent), Some("")) = (level.parent(), parent_code) {
            error!("Invalid {} code", parent);
            return Lookup::empty(Error::InvalidCode(parent));
        }

        let key = level.cache_key(parent_code);
        let ttl = config.current().cache_ttl;
        if let Some(entry) = self.cache.get(&key) {
            if entry.is_fresh(ttl) {
                debug!("Cache hit for key: {}", key);
                return Lookup::Fresh(entry.data);
            }
            debug!("Cache expired for key: {}", key);
        } else {
            debug!("Cache miss for key: {}", key);
        }

        let url = format!("{}{}", base_url, level.endpoint(parent_code));
        let fetcher = fetcher.clone();
        let cache = self.cache.clone();
        let generation = cache.generation();
        let task_url = url.clone();
        let task_key = key.clone();

        let outcome = self
            .inflight
            .get_or_create(&key, move || async move {
                match fetch_records::<T>(&fetcher, &task_url).await {
                    Ok(records) => {
                        let data = Arc::new(records);
                        cache.put_if_current(&task_key, Arc::clone(&data), generation);
                        Lookup::Fresh(data)
                    }
                    Err(err) => fallback(&cache, &task_key, err),
                }
            })
            .await;

        outcome.unwrap_or_else(|err| fallback(&self.cache, &key, Error::network(&url, err)))
    }
}

/// Serve an expired entry if there is one, otherwise nothing.
fn fallback<T: Record>(cache: &CollectionCache<T>, key: &str, err: Error) -> Lookup<T> {
    match cache.get(key) {
        Some(entry) => {
            warn!("Serving stale {} after error: {}", key, err);
            Lookup::Stale {
                data: entry.data,
                error: Arc::new(err),
            }
        }
        None => {
            error!("Error loading {}: {}", key, err);
            Lookup::empty(err)
        }
    }
}

async fn fetch_records<T: Record>(fetcher: &ResilientFetcher, url: &str) -> Result<Vec<T>, Error> {
    let res = fetcher.fetch(url).await?;
    serde_json::from_slice(&res.body).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}
