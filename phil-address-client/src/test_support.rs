//! Scripted in-memory transport for tests.

use crate::error::Error;
use crate::transport::{HttpResponse, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub const MOCK_BASE_URL: &str = "http://psgc.test";

/// Route `log` output through the test harness; `RUST_LOG=debug` shows cache decisions.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug)]
pub enum Reply {
    Body { status: u16, body: String },
    Fail,
    Hang,
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Reply::Body {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Reply::Body {
            status,
            body: String::new(),
        }
    }

    pub fn delayed(millis: u64, reply: Reply) -> Self {
        Reply::Delayed(Duration::from_millis(millis), Box::new(reply))
    }
}

/// Replies are consumed in order per path; the last one repeats forever.
/// Unscripted paths answer 404.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", MOCK_BASE_URL, path)
    }

    pub fn script(&self, path: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), replies.into());
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn next_reply(&self, path: &str) -> Reply {
        *self.calls.lock().unwrap().entry(path.to_string()).or_default() += 1;
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::status(404)),
            None => Reply::status(404),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, Error> {
        let path = url.strip_prefix(MOCK_BASE_URL).unwrap_or(url);
        let mut reply = self.next_reply(path);
        loop {
            match reply {
                Reply::Body { status, body } => {
                    return Ok(HttpResponse {
                        status,
                        body: body.into_bytes(),
                    })
                }
                Reply::Fail => return Err(Error::network(url, "connection refused")),
                Reply::Hang => return futures::future::pending().await,
                Reply::Delayed(delay, next) => {
                    tokio::time::sleep(delay).await;
                    reply = *next;
                }
            }
        }
    }
}
