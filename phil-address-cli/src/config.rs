use chrono::Duration;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use phil_address_client::{ClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;

pub const CONFIG_PATH_VAR: &str = "PHIL_ADDRESS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "phil-address.yaml";
const ENV_PREFIX: &str = "PHIL_ADDRESS_";

#[serde_inline_default]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde_inline_default(DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[serde_inline_default(3_600_000)]
    pub cache_ttl_ms: i64,
    #[serde_inline_default(10_000)]
    pub timeout_ms: i64,
    #[serde_inline_default(3)]
    pub retries: u32,
    #[serde_inline_default("info".to_string())]
    pub log_level: String,
}

impl Config {
    /// YAML file first, then `PHIL_ADDRESS_*` environment variables on top.
    pub fn load() -> Result<Self, figment::Error> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            Duration::milliseconds(self.cache_ttl_ms),
            Duration::milliseconds(self.timeout_ms),
            self.retries,
        )
    }
}
