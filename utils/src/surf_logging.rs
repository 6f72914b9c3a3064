use log::{debug, warn};
use std::time::Instant;
use surf::middleware::{Middleware, Next};
use surf::{Client, Request, Response};

/// Logs every outgoing request with its final status and latency.
#[derive(Debug, Default, Clone, Copy)]
pub struct SurfLogging;

#[surf::utils::async_trait]
impl Middleware for SurfLogging {
    async fn handle(&self, req: Request, client: Client, next: Next<'_>) -> surf::Result<Response> {
        let method = req.method();
        let url = req.url().to_string();
        let start = Instant::now();
        debug!("{} {}", method, url);

        match next.run(req, client).await {
            Ok(res) => {
                let status = res.status();
                let elapsed = start.elapsed();
                if status.is_success() {
                    debug!("{} {} -> {} in {:?}", method, url, status, elapsed);
                } else {
                    warn!("{} {} -> {} in {:?}", method, url, status, elapsed);
                }
                Ok(res)
            }
            Err(err) => {
                warn!("{} {} failed after {:?}: {}", method, url, start.elapsed(), err);
                Err(err)
            }
        }
    }
}
