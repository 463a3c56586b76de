//! Rate-limited HTTP client shared by every provider
//!
//! Each attempt is preceded by a linear backoff sleep (`delay * attempt`).
//! Responses are classified into success, retryable and fatal outcomes so
//! that callers only ever see a typed [`FetchError`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::HttpConfig;
use crate::error::{self, FetchError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Failures below the HTTP status layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connection(String),
}

impl From<TransportFailure> for FetchError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout => FetchError::Timeout,
            TransportFailure::Connection(message) => FetchError::Connection(message),
        }
    }
}

/// Transport seam under the rate-limited client
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> std::result::Result<RawResponse, TransportFailure>;
}

/// reqwest-backed transport with a fixed browser-like header profile
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify_reqwest_error)?;
        Ok(RawResponse { status, body: body.to_vec() })
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        TransportFailure::Timeout
    } else {
        TransportFailure::Connection(e.to_string())
    }
}

/// Headers the stats site expects from a browser session.
///
/// `Accept-Encoding` is left to reqwest, which only advertises what it can decode.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/stats/"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-site"));
    headers.insert(
        "Sec-Ch-Ua",
        HeaderValue::from_static(
            "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
        ),
    );
    headers.insert("Sec-Ch-Ua-Mobile", HeaderValue::from_static("?0"));
    headers.insert("Sec-Ch-Ua-Platform", HeaderValue::from_static("\"Windows\""));
    headers
}

/// HTTP client with linear backoff and bounded retries
#[derive(Clone)]
pub struct RateLimitedClient {
    transport: Arc<dyn HttpTransport>,
    config: HttpConfig,
}

impl RateLimitedClient {
    /// Create a client over the default reqwest transport
    pub fn new(config: HttpConfig) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn with_transport(config: HttpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport, config }
    }

    /// Issue a GET with retries and return the raw body of the first 200
    pub async fn request(&self, url: &str, params: &[(String, String)]) -> error::Result<Vec<u8>> {
        let max_retries = self.config.max_retries.max(1);
        let mut last_error = FetchError::Timeout;

        for attempt in 1..=max_retries {
            let delay = self.config.request_delay() * attempt;
            tokio::time::sleep(delay).await;

            let err = match self.transport.get(url, params, self.config.timeout()).await {
                Ok(response) if response.status == 200 => {
                    info!(attempt, max_retries, url, outcome = "success", "Request succeeded");
                    return Ok(response.body);
                }
                Ok(response) => {
                    let preview = String::from_utf8_lossy(&response.body);
                    debug!(
                        url,
                        status = response.status,
                        "Response body: {}",
                        preview.chars().take(500).collect::<String>()
                    );
                    FetchError::from_status(response.status)
                }
                Err(failure) => FetchError::from(failure),
            };

            if !err.is_retryable() {
                error!(attempt, max_retries, url, outcome = err.kind(), "Request failed: {}", err);
                return Err(err);
            }
            warn!(attempt, max_retries, url, outcome = err.kind(), "Request failed: {}", err);

            // No penalty once the last attempt is spent
            if err.is_rate_limited() && attempt < max_retries {
                warn!(url, "Rate limited, waiting {:?} before retry", delay * 2);
                tokio::time::sleep(delay * 2).await;
            }
            last_error = err;
        }

        error!(url, "All {} attempts failed: {}", max_retries, last_error);
        Err(last_error)
    }

    /// GET and decode a JSON body; a malformed 200 is not retried
    pub async fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> error::Result<serde_json::Value> {
        let body = self.request(url, params).await?;
        serde_json::from_slice(&body).map_err(|e| {
            let err = FetchError::Decode(e.to_string());
            error!(url, outcome = err.kind(), "JSON decode error: {}", e);
            err
        })
    }

    /// GET and decode a UTF-8 text body
    pub async fn get_text(&self, url: &str, params: &[(String, String)]) -> error::Result<String> {
        let body = self.request(url, params).await?;
        String::from_utf8(body).map_err(|e| {
            let err = FetchError::Decode(e.to_string());
            error!(url, outcome = err.kind(), "Body is not valid UTF-8: {}", e);
            err
        })
    }

    /// Single-shot connectivity check: no backoff, no retries
    pub async fn probe(&self, url: &str) -> error::Result<()> {
        match self.transport.get(url, &[], self.config.probe_timeout()).await {
            Ok(response) if response.status == 200 => Ok(()),
            Ok(response) => Err(FetchError::from_status(response.status)),
            Err(failure) => Err(FetchError::from(failure)),
        }
    }
}
