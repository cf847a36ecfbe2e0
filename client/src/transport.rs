use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use promcon_core::error::ErrorBody;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// The HTTP seam. Registry, tag and schema clients talk to the backend only
/// through this trait, so tests can swap in an in-memory backend and the
/// production path stays a single reqwest wrapper.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request and return the decoded envelope body. Implementors
    /// must apply the envelope rule: a response without `success:true` is an
    /// error even on HTTP 200.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ClientError>;

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ClientError> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str, query: &[(String, String)]) -> Result<Value, ClientError> {
        self.request(Method::DELETE, path, query, None).await
    }
}

/// Production transport over reqwest. Base URL and timeouts come from
/// [`ClientConfig`]; every request carries an explicit timeout so a stuck
/// backend surfaces as [`ClientError::Timeout`] rather than hanging the UI
/// flow.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut url = reqwest::Url::parse(&url)
            .map_err(|e| ClientError::InvalidInput(format!("invalid URL '{url}': {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }

        let mut req = self
            .client
            .request(method, url)
            .timeout(self.config.timeout);
        if let Some(b) = body {
            req = req.json(&b);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.config.timeout))?;
        let status = resp.status().as_u16();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.config.timeout))?;

        check_envelope(status, body)
    }
}

/// Apply the backend's envelope rule: the body must carry `success:true` and
/// the status must be 2xx, otherwise the structured error body (detail, then
/// message, then error code) is surfaced verbatim with a generic fallback.
pub fn check_envelope(status: u16, body: Value) -> Result<Value, ClientError> {
    let success = body
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if (200..300).contains(&status) && success {
        return Ok(body);
    }

    let parsed: ErrorBody = serde_json::from_value(body).unwrap_or_default();
    let message = parsed
        .human_message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("backend request failed (HTTP {status})"));
    Err(ClientError::Api {
        code: parsed.error,
        message,
    })
}

/// Deserialize the payload portion of a checked envelope.
pub fn payload<T: DeserializeOwned>(body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Percent-encode one path segment (reference values may contain spaces and
/// slashes).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
