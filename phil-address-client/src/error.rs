use crate::records::Level;
use chrono::Duration;
use strum_macros::Display;

/// Coarse classification of [`Error`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    Network,
    Timeout,
    InvalidInput,
    Decode,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error while fetching {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("HTTP {status} while fetching {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} timed out after {}ms", .timeout.num_milliseconds())]
    Timeout { url: String, timeout: Duration },
    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {0} code")]
    InvalidCode(Level),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network { .. } | Error::Status { .. } => ErrorKind::Network,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::InvalidCode(_) => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn network(url: &str, reason: impl ToString) -> Self {
        Error::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
