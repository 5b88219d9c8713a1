//! Error types for the news feed pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP client closed")]
    ClientClosed,

    #[error("Unexpected HTTP status: {0}")]
    BadStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// Short machine-friendly label, used as a metric label
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::InvalidUrl(_) => "invalid_url",
            FeedError::Network(_) => "network",
            FeedError::ClientClosed => "client_closed",
            FeedError::BadStatus(_) => "bad_status",
            FeedError::MalformedResponse(_) => "malformed_response",
            FeedError::ImageDecode(_) => "image_decode",
            FeedError::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::MalformedResponse(e.to_string())
    }
}

impl From<config::ConfigError> for FeedError {
    fn from(e: config::ConfigError) -> Self {
        FeedError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(FeedError::BadStatus(404).kind(), "bad_status");
        assert_eq!(FeedError::InvalidUrl("x".into()).kind(), "invalid_url");
        assert_eq!(
            FeedError::MalformedResponse("missing results".into()).to_string(),
            "Malformed response: missing results"
        );
    }

    #[test]
    fn test_json_error_is_malformed_response() {
        let err: FeedError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FeedError::MalformedResponse(_)));
    }
}
