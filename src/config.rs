//! Configuration for the Feed Pipeline

use serde::Deserialize;
use std::time::Duration;

use crate::date::Locale;
use crate::error::{FeedError, Result};
use crate::http_client::{parse_url, HttpClientConfig};
use crate::query::FeedQuery;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Search endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,

    // Query filters
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default = "default_section")]
    pub section: String,
    #[serde(default = "default_order_by")]
    pub order_by: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    // HTTP timeouts (milliseconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,

    // Concurrency
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    // Date formatting
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_api_endpoint() -> String {
    "https://content.guardianapis.com/search".to_string()
}

fn default_api_key() -> String {
    "test".to_string()
}

fn default_query() -> String {
    "physics AND NOT obituary".to_string()
}

fn default_tag() -> String {
    "science/physics|education/physics".to_string()
}

fn default_section() -> String {
    "science|technology|education|environment".to_string()
}

fn default_order_by() -> String {
    "newest".to_string()
}

fn default_page_size() -> u32 {
    30
}

fn default_connect_timeout() -> u64 {
    15000 // 15 seconds
}

fn default_read_timeout() -> u64 {
    10000 // 10 seconds
}

fn default_max_concurrent_requests() -> usize {
    10
}

fn default_locale() -> String {
    "en_US".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            api_key: default_api_key(),
            query: default_query(),
            tag: default_tag(),
            section: default_section(),
            order_by: default_order_by(),
            page_size: default_page_size(),
            connect_timeout_ms: default_connect_timeout(),
            read_timeout_ms: default_read_timeout(),
            max_concurrent_requests: default_max_concurrent_requests(),
            locale: default_locale(),
        }
    }
}

impl Config {
    /// Loads `NEWSFEED__*` environment variables, after reading `.env`
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("NEWSFEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        parse_url(&self.api_endpoint)
            .map_err(|e| FeedError::Config(format!("api_endpoint: {}", e)))?;

        if self.page_size == 0 {
            return Err(FeedError::Config("page_size must be positive".to_string()));
        }
        if self.connect_timeout_ms == 0 || self.read_timeout_ms == 0 {
            return Err(FeedError::Config("timeouts must be positive".to_string()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(FeedError::Config(
                "max_concurrent_requests must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            max_concurrent_requests: self.max_concurrent_requests,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            ..Default::default()
        }
    }

    pub fn feed_query(&self) -> FeedQuery {
        FeedQuery::new(&self.api_endpoint, &self.api_key)
            .query(&self.query)
            .tag(&self.tag)
            .section(&self.section)
            .order_by(&self.order_by)
            .page_size(self.page_size)
    }

    pub fn locale(&self) -> Locale {
        Locale::parse(&self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.api_endpoint, "https://content.guardianapis.com/search");
        assert_eq!(config.page_size, 30);
        assert_eq!(config.max_concurrent_requests, 10);
        assert!(config.locale().is_us());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_client_config() {
        let http = Config::default().http_client_config();
        assert_eq!(http.connect_timeout, Duration::from_millis(15_000));
        assert_eq!(http.read_timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            api_endpoint: "content.guardianapis.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FeedError::Config(_))));

        let config = Config {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            read_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config =
            serde_json::from_str(r#"{"api_key": "secret", "locale": "en_GB", "page_size": 10}"#)
                .unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.page_size, 10);
        assert!(!config.locale().is_us());
        assert_eq!(config.order_by, "newest");

        let url = config.feed_query().to_url().unwrap();
        assert!(url.as_str().contains("api-key=secret"));
        assert!(url.as_str().contains("page-size=10"));
    }
}
