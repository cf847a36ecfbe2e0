use std::time::Duration;

use thiserror::Error;

/// Error taxonomy for everything the client library does.
///
/// The split between [`ClientError::Timeout`] and [`ClientError::Connection`]
/// is load-bearing: a timeout usually means the backend is busy doing remote
/// SSH work ("server slow"), a connection failure means it is unreachable
/// ("server broken"), and the UI words its messages accordingly.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request exceeded its deadline
    #[error("request timed out after {0:?}; the backend may be performing slow remote work")]
    Timeout(Duration),

    /// Connection refused, DNS failure, TLS failure
    #[error("connection failed: {0}")]
    Connection(String),

    /// Backend answered but reported failure (`success:false` or HTTP 4xx/5xx
    /// with a structured body); `message` is the backend's own wording where
    /// it supplied one
    #[error("{message}")]
    Api {
        code: Option<String>,
        message: String,
    },

    /// Delete blocked: the value is still referenced by live records and no
    /// force flag was supplied
    #[error("'{value}' is still in use and was not deleted; retry with force to remove it anyway")]
    ValueInUse { value: String },

    /// Client-side validation failure, raised before any network call
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Response was not JSON or not the expected envelope shape
    #[error("invalid response from backend: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::Connection(_))
    }

    /// Backend error code, when the backend supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Classify a reqwest failure. Reqwest folds timeouts into its generic
    /// error type, so this is the one place that distinction is recovered.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(timeout)
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Connection(err.to_string())
        }
    }
}
