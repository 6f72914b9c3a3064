use chrono::Duration;
use log::info;
use std::sync::{Arc, PoisonError, RwLock};

/// Default API serving the PSGC collections.
pub const DEFAULT_BASE_URL: &str = "https://phil-address-api.rayoedmund.workers.dev";

/// Configuration read by every fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long a cached collection is considered fresh
    pub cache_ttl: Duration,
    /// Upper bound for a single HTTP attempt
    pub timeout: Duration,
    /// Additional attempts after the first failure
    pub retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::hours(1),
            timeout: Duration::seconds(10),
            retries: 3,
        }
    }
}

impl ClientConfig {
    pub fn new(cache_ttl: Duration, timeout: Duration, retries: u32) -> Self {
        Self {
            cache_ttl,
            timeout,
            retries,
        }
    }

    /// Shallow merge: fields set in `update` win, everything else is kept.
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        Self {
            cache_ttl: update.cache_ttl.unwrap_or(self.cache_ttl),
            timeout: update.timeout.unwrap_or(self.timeout),
            retries: update.retries.unwrap_or(self.retries),
        }
    }
}

/// Partial configuration passed to `configure`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub cache_ttl: Option<Duration>,
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
}

impl ConfigUpdate {
    pub fn cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = Some(cache_ttl);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// The current configuration of a client. Readers get a snapshot; writers swap the whole value.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig(Arc<RwLock<Arc<ClientConfig>>>);

impl SharedConfig {
    pub fn new(config: ClientConfig) -> Self {
        Self(Arc::new(RwLock::new(Arc::new(config))))
    }

    pub fn current(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.0.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn update(&self, update: &ConfigUpdate) -> Arc<ClientConfig> {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(guard.merged(update));
        *guard = Arc::clone(&next);
        info!(
            "Client reconfigured (TTL: {}ms, timeout: {}ms, retries: {})",
            next.cache_ttl.num_milliseconds(),
            next.timeout.num_milliseconds(),
            next.retries
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_only_touches_given_fields() {
        let shared = SharedConfig::new(ClientConfig::default());
        let before = shared.current();

        shared.update(&ConfigUpdate::default().retries(0));

        let after = shared.current();
        assert_eq!(after.retries, 0);
        assert_eq!(after.cache_ttl, Duration::hours(1));
        assert_eq!(after.timeout, Duration::seconds(10));
        // Earlier snapshots are never mutated in place
        assert_eq!(before.retries, 3);
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedConfig::new(ClientConfig::default());
        let other = shared.clone();
        other.update(&ConfigUpdate::default().cache_ttl(Duration::minutes(5)));
        assert_eq!(shared.current().cache_ttl, Duration::minutes(5));
    }
}
