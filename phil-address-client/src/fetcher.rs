use crate::config::SharedConfig;
use crate::error::Error;
use crate::transport::{HttpResponse, Transport};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;

/// Delay unit for linear backoff: the n-th retry waits n units.
pub const BACKOFF_UNIT: StdDuration = StdDuration::from_millis(1000);

/// Wraps a [`Transport`] with a per-attempt timeout and linear retry.
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
    config: SharedConfig,
}

impl ResilientFetcher {
    pub fn new(transport: Arc<dyn Transport>, config: SharedConfig) -> Self {
        Self { transport, config }
    }

    /// Fetch `url`, retrying transport failures, timeouts and non-2xx statuses.
    ///
    /// The configuration is read once per call, so a `configure` issued while a
    /// retry sequence is sleeping only affects later calls.
    pub async fn fetch(&self, url: &str) -> Result<HttpResponse, Error> {
        let config = self.config.current();
        let timeout = config.timeout.to_std().unwrap_or(StdDuration::ZERO);
        let mut remaining = config.retries;

        loop {
            let err = match tokio::time::timeout(timeout, self.transport.get(url)).await {
                Ok(Ok(res)) if res.is_success() => return Ok(res),
                Ok(Ok(res)) => Error::Status {
                    url: url.to_string(),
                    status: res.status,
                },
                Ok(Err(err)) => err,
                Err(_) => Error::Timeout {
                    url: url.to_string(),
                    timeout: config.timeout,
                },
            };

            if remaining == 0 {
                return Err(err);
            }

            let attempt = config.retries - remaining + 1;
            let delay = BACKOFF_UNIT * attempt;
            warn!(
                "Attempt {} for {} failed: {}; retrying in {:?}",
                attempt, url, err, delay
            );
            tokio::time::sleep(delay).await;
            remaining -= 1;
            debug!("Retrying {} ({} retries left)", url, remaining);
        }
    }
}
