//! HTTP transport to the record-keeping backend
//!
//! Every request goes to the one configured base URL. No retries, no
//! caching and no auth header: failures come straight back as
//! [`CoreError`] values for the caller to show.

use async_trait::async_trait;
use debweb_config::Config;
use debweb_core::error::{CoreError, CoreResult};
use debweb_core::transport::{ApiRequest, Method, Transport};
use std::time::Duration;

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> CoreResult<Self> {
        Self::new(
            config.backend_base(),
            Duration::from_secs(config.backend.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `request`, query string included
    pub fn url_for(&self, request: &ApiRequest) -> String {
        join_url(&self.base_url, &request.target())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> CoreResult<serde_json::Value> {
        let url = self.url_for(&request);
        log::debug!(target: "debweb::http", "{} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = match request.body {
            Some(ref body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            log::warn!(target: "debweb::http", "{} failed: {}", request, e);
            network_error(&e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            log::warn!(target: "debweb::http", "{} body unreadable: {}", request, e);
            network_error(&e)
        })?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            });
            log::warn!(target: "debweb::http", "{} -> {}: {}", request, status.as_u16(), message);
            return Err(CoreError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::json!({ "success": true }));
        }
        serde_json::from_str(&text).map_err(|e| {
            log::warn!(target: "debweb::http", "{} returned invalid JSON: {}", request, e);
            CoreError::Decode {
                message: e.to_string(),
            }
        })
    }
}

fn network_error(error: &reqwest::Error) -> CoreError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };
    CoreError::Network { message }
}

fn join_url(base: &str, target: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        target.trim_start_matches('/')
    )
}

/// `message` (or `error`) field of a JSON error body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
