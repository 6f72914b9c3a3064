use crate::error::Error;
use async_trait::async_trait;
use surf::Client;
use utils::surf_logging::SurfLogging;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests. Errors are transport failures only; any status code is a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct SurfTransport {
    http: Client,
}

impl Default for SurfTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new().with(SurfLogging),
        }
    }
}

#[async_trait]
impl Transport for SurfTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, Error> {
        // surf panics on URLs it cannot parse
        let parsed = surf::Url::parse(url).map_err(|err| Error::network(url, err))?;
        let mut res = self
            .http
            .get(parsed)
            .await
            .map_err(|err| Error::network(url, err))?;
        let status = u16::from(res.status());
        let body = res
            .body_bytes()
            .await
            .map_err(|err| Error::network(url, err))?;
        Ok(HttpResponse { status, body })
    }
}
