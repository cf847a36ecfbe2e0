use std::time::Duration;

/// Env var holding the API base URL, e.g. `http://monitoring-admin:8000/api`.
pub const API_URL_ENV: &str = "PROMCON_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout for plain registry/schema traffic.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for operations the backend serves via remote SSH work (config
/// file access, service reloads). Those calls are legitimately slow; the UI
/// should report "server slow", not "server broken".
pub const SLOW_OP_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`crate::HttpTransport`]. Callers hitting
/// SSH-backed endpoints should raise `timeout` toward [`SLOW_OP_TIMEOUT`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Trailing slash would double up when joining paths
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL from `PROMCON_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        let base = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let cfg = ClientConfig::new("http://example:8000/api//");
        assert_eq!(cfg.base_url, "http://example:8000/api");
    }

    #[test]
    fn timeouts_stay_in_the_supported_range() {
        assert!(DEFAULT_TIMEOUT >= Duration::from_secs(10));
        assert!(SLOW_OP_TIMEOUT <= Duration::from_secs(60));
    }
}
