//! Client for the Philippine Standard Geographic Code (PSGC) address API.
//!
//! Regions, provinces, cities/municipalities and barangays are fetched over HTTP
//! and kept in per-collection TTL caches. Concurrent requests for the same
//! collection share one network call, failed attempts are retried with linear
//! backoff, and a failed refresh falls back to the expired entry. None of the
//! loaders return errors: a lookup degrades to stale data or an empty list.
//!
//! ```ignore
//! use phil_address_client::{PhilAddressClient, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = PhilAddressClient::new();
//!     let regions = client.regions().await;
//!     let hits = client.fuzzy_search("laoag", &SearchOptions::default()).await;
//!     println!("{} regions, {} hits", regions.len(), hits.len());
//! }
//! ```

pub mod address;
pub mod cache;
pub mod config;
mod deduplication;
mod error;
mod fetcher;
mod loader;
pub mod records;
pub mod search;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use address::{construct_address, AddressParts};
pub use cache::CacheStats;
pub use config::{ClientConfig, ConfigUpdate, DEFAULT_BASE_URL};
use config::SharedConfig;
pub use error::{Error, ErrorKind};
use fetcher::ResilientFetcher;
use loader::Collection;
pub use loader::Lookup;
pub use records::{Barangay, City, Level, Province, Record, Region};
pub use search::{Place, SearchOptions, SearchResult};
use std::sync::Arc;
pub use transport::{HttpResponse, SurfTransport, Transport};

struct Inner {
    base_url: String,
    config: SharedConfig,
    fetcher: ResilientFetcher,
    regions: Collection<Region>,
    provinces: Collection<Province>,
    cities: Collection<City>,
    barangays: Collection<Barangay>,
}

/// Cached client for the four PSGC collections.
///
/// Clones share caches, in-flight requests and configuration; separately
/// constructed clients are fully independent.
#[derive(Clone)]
pub struct PhilAddressClient {
    inner: Arc<Inner>,
}

impl Default for PhilAddressClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PhilAddressClient {
    /// Create a client for the public API with default settings
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client for the public API with the given configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(DEFAULT_BASE_URL, Arc::new(SurfTransport::new()), config)
    }

    /// Create a client against `base_url`, issuing requests through `transport`
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let config = SharedConfig::new(config);
        let fetcher = ResilientFetcher::new(transport, config.clone());
        log::info!(
            "Initialized PhilAddressClient for {} (TTL: {}ms, timeout: {}ms, retries: {})",
            base_url,
            config.current().cache_ttl.num_milliseconds(),
            config.current().timeout.num_milliseconds(),
            config.current().retries
        );

        Self {
            inner: Arc::new(Inner {
                base_url,
                config,
                fetcher,
                regions: Collection::default(),
                provinces: Collection::default(),
                cities: Collection::default(),
                barangays: Collection::default(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    async fn load<T: Record>(&self, collection: &Collection<T>, parent_code: Option<&str>) -> Lookup<T> {
        collection
            .load(parent_code, &self.inner.base_url, &self.inner.fetcher, &self.inner.config)
            .await
    }

    pub async fn load_regions(&self) -> Lookup<Region> {
        self.load(&self.inner.regions, None).await
    }

    pub async fn load_provinces(&self, region_code: &str) -> Lookup<Province> {
        self.load(&self.inner.provinces, Some(region_code)).await
    }

    pub async fn load_cities(&self, province_code: &str) -> Lookup<City> {
        self.load(&self.inner.cities, Some(province_code)).await
    }

    pub async fn load_barangays(&self, city_code: &str) -> Lookup<Barangay> {
        self.load(&self.inner.barangays, Some(city_code)).await
    }

    /// All regions; empty if they could not be loaded and nothing is cached
    pub async fn regions(&self) -> Vec<Region> {
        self.load_regions().await.into_vec()
    }

    /// Provinces of a region; empty for an empty code
    pub async fn provinces(&self, region_code: &str) -> Vec<Province> {
        self.load_provinces(region_code).await.into_vec()
    }

    /// Cities and municipalities of a province; empty for an empty code
    pub async fn cities(&self, province_code: &str) -> Vec<City> {
        self.load_cities(province_code).await.into_vec()
    }

    /// Barangays of a city; empty for an empty code
    pub async fn barangays(&self, city_code: &str) -> Vec<Barangay> {
        self.load_barangays(city_code).await.into_vec()
    }

    pub async fn region_by_code(&self, code: &str) -> Option<Region> {
        find_by_code(self.load_regions().await, code)
    }

    pub async fn province_by_code(&self, region_code: &str, code: &str) -> Option<Province> {
        find_by_code(self.load_provinces(region_code).await, code)
    }

    pub async fn city_by_code(&self, province_code: &str, code: &str) -> Option<City> {
        find_by_code(self.load_cities(province_code).await, code)
    }

    pub async fn barangay_by_code(&self, city_code: &str, code: &str) -> Option<Barangay> {
        find_by_code(self.load_barangays(city_code).await, code)
    }

    /// Merge `update` into the configuration. Cached entries are kept; the new
    /// TTL applies to every freshness check from now on.
    pub fn configure(&self, update: ConfigUpdate) {
        self.inner.config.update(&update);
    }

    pub fn config(&self) -> ClientConfig {
        (*self.inner.config.current()).clone()
    }

    /// Drop every cached collection and forget in-flight requests
    pub fn clear_cache(&self) {
        let inner = &self.inner;
        inner.regions.cache.clear();
        inner.provinces.cache.clear();
        inner.cities.cache.clear();
        inner.barangays.cache.clear();
        inner.regions.inflight.clear();
        inner.provinces.inflight.clear();
        inner.cities.inflight.clear();
        inner.barangays.inflight.clear();
        log::info!("Cache cleared");
    }

    /// Drop entries older than the current TTL. They can no longer serve as stale fallback.
    pub fn evict_expired_cache(&self) -> usize {
        let ttl = self.inner.config.current().cache_ttl;
        let inner = &self.inner;
        inner.regions.cache.evict_expired(ttl)
            + inner.provinces.cache.evict_expired(ttl)
            + inner.cities.cache.evict_expired(ttl)
            + inner.barangays.cache.evict_expired(ttl)
    }

    pub fn cache_stats(&self) -> CacheStats {
        let inner = &self.inner;
        let regions = inner.regions.cache.len();
        let provinces = inner.provinces.cache.len();
        let cities = inner.cities.cache.len();
        let barangays = inner.barangays.cache.len();

        CacheStats {
            regions,
            provinces,
            cities,
            barangays,
            pending_requests: inner.regions.inflight.len()
                + inner.provinces.inflight.len()
                + inner.cities.inflight.len()
                + inner.barangays.inflight.len(),
            total_cached: regions + provinces + cities + barangays,
        }
    }
}

fn find_by_code<T: Record>(lookup: Lookup<T>, code: &str) -> Option<T> {
    lookup.data().iter().find(|record| record.code() == code).cloned()
}
