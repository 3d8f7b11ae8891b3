use std::time::Duration;

use thiserror::Error;

/// Why a lookup produced an error payload instead of data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {url} timed out after {}ms", timeout.as_millis())]
    Timeout {
        url: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    #[error("invalid JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid JSON response: empty JSON object")]
    EmptyObject,
}

impl FetchError {
    pub(crate) fn from_send(error: reqwest::Error, url: &str, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout,
                source: error,
            }
        } else {
            Self::Transport(error)
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
