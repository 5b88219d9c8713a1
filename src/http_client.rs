//! HTTP Client Module
//!
//! Provides the feed's HTTP fetcher:
//! - Fixed connect/read timeouts (15s / 10s)
//! - Semaphore-based concurrency limiting, shared by feed and thumbnail requests
//! - Typed failures: invalid URL, network error, non-200 status
//!
//! No retries are attempted; a failed request is reported once and the caller
//! decides how to degrade.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

use crate::error::{FeedError, Result};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum concurrent requests in flight
    pub max_concurrent_requests: usize,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Read timeout (between body chunks)
    pub read_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            connect_timeout: Duration::from_millis(15_000),
            read_timeout: Duration::from_millis(10_000),
            user_agent: format!("newsfeed-ingestion/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A GET-only fetcher returning the raw body of a 200 response
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Fetches `url` and returns the full body
    async fn get(&self, url: &str) -> Result<Bytes>;

    /// Fetches `url` and decodes the body as UTF-8
    async fn get_text(&self, url: &str) -> Result<String> {
        let body = self.get(url).await?;
        String::from_utf8(body.to_vec())
            .map_err(|e| FeedError::MalformedResponse(format!("body is not UTF-8: {}", e)))
    }
}

/// Validates that `raw` is an absolute http(s) URL
pub fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| FeedError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FeedError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw, other
        ))),
    }
}

/// reqwest-backed fetcher with concurrency limiting
pub struct FeedHttpClient {
    /// Inner reqwest client
    client: Client,
    /// Global concurrency semaphore
    semaphore: Arc<Semaphore>,
}

impl FeedHttpClient {
    /// Creates a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FeedError::Network)?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests.max(1)));

        Ok(Self { client, semaphore })
    }

    /// Creates a client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpClientConfig::default())
    }

    /// Gets the number of available permits
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Stops accepting requests. Requests already in flight complete;
    /// later ones fail with `ClientClosed`.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

#[async_trait]
impl HttpFetch for FeedHttpClient {
    async fn get(&self, url: &str) -> Result<Bytes> {
        let url = parse_url(url)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FeedError::ClientClosed)?;

        debug!(url = %url, "Executing HTTP request");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            debug!(url = %url, status = %status, "Request rejected");
            return Err(FeedError::BadStatus(status.as_u16()));
        }

        let body = response.bytes().await?;

        debug!(url = %url, bytes = body.len(), "Request succeeded");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HttpClientConfig::default();
        assert_eq!(config.max_concurrent_requests, 10);
        assert_eq!(config.connect_timeout, Duration::from_millis(15_000));
        assert_eq!(config.read_timeout, Duration::from_millis(10_000));
    }

    #[tokio::test]
    async fn test_semaphore_limiting() {
        let config = HttpClientConfig {
            max_concurrent_requests: 2,
            ..Default::default()
        };

        let client = FeedHttpClient::new(config).unwrap();

        assert_eq!(client.available_permits(), 2);
    }

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://content.guardianapis.com/search?q=x").is_ok());
        assert!(matches!(parse_url("not a url"), Err(FeedError::InvalidUrl(_))));
        assert!(matches!(parse_url("/relative/path"), Err(FeedError::InvalidUrl(_))));
        assert!(matches!(parse_url("ftp://example.com/a"), Err(FeedError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_invalid_url_skips_network() {
        let client = FeedHttpClient::with_defaults().unwrap();
        let err = client.get("::::").await.unwrap_err();
        assert!(matches!(err, FeedError::InvalidUrl(_)));
        assert_eq!(client.available_permits(), 10);
    }

    #[tokio::test]
    async fn test_closed_client_rejects_requests() {
        let client = FeedHttpClient::with_defaults().unwrap();
        client.close();

        let err = client.get("http://127.0.0.1:9/search").await.unwrap_err();
        assert!(matches!(err, FeedError::ClientClosed));
        assert_eq!(err.kind(), "client_closed");
    }
}
