//! Newsfeed Ingestion
//!
//! Fetches a news search feed, keeps its article entries and normalizes them
//! into display-ready [`NewsRecord`]s, each with an optional thumbnail.
//!
//! Features:
//! - Fail-soft pipeline: every feed-level failure yields an empty list
//! - Per-entry isolation: one malformed entry never drops its siblings
//! - Locale-aware short dates (`MM/dd/yy` for US, `dd/MM/yy` otherwise)
//! - Concurrent thumbnail fetches, joined back in source order
//! - Injected diagnostics instead of a global logger
//! - Prometheus counters per diagnostic event

pub mod config;
pub mod date;
pub mod diagnostics;
pub mod error;
pub mod http_client;
pub mod image_fetcher;
pub mod metrics;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod schemas;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use date::Locale;
pub use diagnostics::{DiagnosticEvent, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::{FeedError, Result};
pub use http_client::{FeedHttpClient, HttpClientConfig, HttpFetch};
pub use image_fetcher::ImageFetcher;
pub use parser::{FeedParser, ParsedEntry};
pub use pipeline::FeedPipeline;
pub use query::FeedQuery;
pub use schemas::{NewsRecord, Thumbnail};
