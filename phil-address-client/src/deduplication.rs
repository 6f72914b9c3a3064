use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::Future;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeduplicationError {
    #[error("pending request for {key} did not complete: {reason}")]
    TaskFailed { key: String, reason: String },
}

type SharedComputation<V> = Shared<BoxFuture<'static, Result<V, DeduplicationError>>>;

/// Drops the registration once its task ends, including by panic.
struct Settle<V: Clone> {
    pending: Arc<DashMap<String, PendingRequest<V>>>,
    key: String,
    id: u64,
}

impl<V: Clone> Drop for Settle<V> {
    fn drop(&mut self) {
        // A clear() may have let a newer request take this key
        let id = self.id;
        self.pending.remove_if(&self.key, |_, request| request.id == id);
    }
}

/// A computation already underway for some key
struct PendingRequest<V: Clone> {
    id: u64,
    started_at: DateTime<Utc>,
    computation: SharedComputation<V>,
}

/// Request deduplication system
/// When several callers ask for the same key while a request is in flight,
/// only the first one runs; everyone awaits the same shared result.
pub struct RequestDeduplicator<V: Clone> {
    pending: Arc<DashMap<String, PendingRequest<V>>>,
    next_id: AtomicU64,
}

impl<V: Clone> Default for RequestDeduplicator<V> {
    fn default() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<V> RequestDeduplicator<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the computation pending for `key`, or register and spawn the one built by `make`.
    ///
    /// The computation runs on its own task, so it completes even if every caller is dropped.
    /// The registration is removed once it settles, whatever its outcome.
    pub async fn get_or_create<F, Fut>(&self, key: &str, make: F) -> Result<V, DeduplicationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let computation = match self.pending.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!(
                    "Request already pending for key: {} (since {})",
                    key,
                    entry.get().started_at
                );
                entry.get().computation.clone()
            }
            Entry::Vacant(entry) => {
                debug!("Executing new request for key: {}", key);
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let settle = Settle {
                    pending: Arc::clone(&self.pending),
                    key: key.to_string(),
                    id,
                };
                let work = make();
                let handle = tokio::spawn(async move {
                    let _settle = settle;
                    work.await
                });
                let owned_key = key.to_string();
                let computation = handle
                    .map(move |joined| {
                        joined.map_err(|err| DeduplicationError::TaskFailed {
                            key: owned_key,
                            reason: err.to_string(),
                        })
                    })
                    .boxed()
                    .shared();
                entry.insert(PendingRequest {
                    id,
                    started_at: Utc::now(),
                    computation: computation.clone(),
                });
                computation
            }
        };

        computation.await
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every pending request. In-flight work still settles for the callers already awaiting it.
    pub fn clear(&self) {
        self.pending.clear();
    }
}
