//! HTTP transport clients
use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use std::time::Duration;

/// A completed HTTP exchange as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single blocking GET. Retries and caching live above this seam.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> ApiResult<HttpResponse>;
}

/// Blocking `reqwest` transport with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_seconds))
            .timeout(Duration::from_secs(config.timeouts.read_seconds))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpClient {
    fn get(&self, url: &Url) -> ApiResult<HttpResponse> {
        let transport_err = |e: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        };

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(transport_err)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(transport_err)?;
        Ok(HttpResponse { status, body })
    }
}
