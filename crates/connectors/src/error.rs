use thiserror::Error;

/// Errors raised while talking to the node's chain API.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The node URL is not an absolute http(s) URL.
    #[error("Invalid node URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout.
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// Connection, TLS or body transfer failure.
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a non-success HTTP status.
    #[error("{endpoint} answered with HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The body was not the JSON document we expected.
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body decoded but its contents are inconsistent.
    #[error("Malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}

impl RpcError {
    pub(crate) fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            RpcError::Transport {
                endpoint: endpoint.to_string(),
                source: err,
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Timeout { .. })
    }
}
