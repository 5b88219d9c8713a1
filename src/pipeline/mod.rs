//! Feed Pipeline
//!
//! Implements: fetch feed → extract entries → resolve thumbnails
//!
//! This is the single entry point for callers. Each run is independent: no
//! state survives between calls apart from the HTTP client and its settings.
//! Every failure at the feed level is reported to diagnostics and turns into
//! an empty result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info_span, Instrument};

use crate::config::Config;
use crate::date::Locale;
use crate::diagnostics::{DiagnosticEvent, SharedDiagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::http_client::{FeedHttpClient, HttpFetch};
use crate::image_fetcher::ImageFetcher;
use crate::metrics::{self, STAGE_FEED};
use crate::parser::FeedParser;
use crate::schemas::NewsRecord;

pub struct FeedPipeline {
    client: Arc<dyn HttpFetch>,
    parser: FeedParser,
    diagnostics: SharedDiagnostics,
}

impl FeedPipeline {
    /// Builds a pipeline whose feed and thumbnail requests share `client`
    pub fn new(client: Arc<dyn HttpFetch>, locale: Locale, diagnostics: SharedDiagnostics) -> Self {
        let images = ImageFetcher::new(client.clone(), diagnostics.clone());
        let parser = FeedParser::new(images, locale, diagnostics.clone());

        Self {
            client,
            parser,
            diagnostics,
        }
    }

    /// Builds the reqwest client and tracing diagnostics from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = FeedHttpClient::new(config.http_client_config())?;
        Ok(Self::new(
            Arc::new(client),
            config.locale(),
            TracingDiagnostics::shared(),
        ))
    }

    pub fn parser(&self) -> &FeedParser {
        &self.parser
    }

    /// Runs the pipeline, surfacing feed-level failures as errors.
    /// Per-record failures (thumbnail, date) are still absorbed.
    pub async fn try_fetch_feed(&self, query_url: &str) -> Result<Vec<NewsRecord>> {
        let text = self.fetch_text(query_url).await?;
        self.parser.try_parse(&text).await
    }

    /// Runs the pipeline. Network errors, bad statuses and malformed
    /// responses all yield an empty list; the cause goes to diagnostics.
    pub async fn fetch_feed(&self, query_url: &str) -> Vec<NewsRecord> {
        let span = info_span!("fetch_feed", run_id = %uuid::Uuid::new_v4());

        async {
            let text = match self.fetch_text(query_url).await {
                Ok(text) => text,
                Err(e) => {
                    self.diagnostics
                        .report(DiagnosticEvent::feed_fetch_failed(query_url, &e));
                    return Vec::new();
                }
            };

            match self.parser.try_parse(&text).await {
                Ok(records) => {
                    self.diagnostics.report(DiagnosticEvent::FeedAssembled {
                        records: records.len(),
                    });
                    records
                }
                Err(e) => {
                    self.diagnostics.report(DiagnosticEvent::MalformedResponse {
                        error: e.to_string(),
                    });
                    Vec::new()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn fetch_text(&self, query_url: &str) -> Result<String> {
        let started = Instant::now();
        let text = self.client.get_text(query_url).await;
        metrics::record_fetch_latency(STAGE_FEED, started.elapsed().as_secs_f64());

        if let Ok(text) = &text {
            debug!(bytes = text.len(), "Fetched feed body");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::diagnostics::RecordingDiagnostics;
    use crate::error::FeedError;
    use crate::test_support::{png_bytes, StaticFetch};

    const FEED_URL: &str = "https://content.guardianapis.test/search?q=physics";

    fn pipeline(fetch: StaticFetch) -> (FeedPipeline, Arc<RecordingDiagnostics>) {
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        (
            FeedPipeline::new(Arc::new(fetch), Locale::us(), diagnostics.clone()),
            diagnostics,
        )
    }

    fn feed_body() -> String {
        json!({"response": {"results": [
            {
                "type": "article",
                "sectionName": "Science",
                "webPublicationDate": "2021-03-05T14:00:00Z",
                "webTitle": "Dark matter mystery deepens",
                "webUrl": "https://www.theguardian.com/science/dark-matter",
                "tags": [{"webTitle": "Jane Doe"}, {"webTitle": "John Roe"}],
                "fields": {"thumbnail": "https://img.test/dark.png"}
            },
            {"type": "liveblog", "webTitle": "Live"}
        ]}})
        .to_string()
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let fetch = StaticFetch::new()
            .with_body(FEED_URL, feed_body())
            .with_body("https://img.test/dark.png", png_bytes(4, 4));
        let (pipeline, diagnostics) = pipeline(fetch);

        let records = pipeline.fetch_feed(FEED_URL).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Dark matter mystery deepens");
        assert_eq!(records[0].author(), "Jane Doe, ...");
        assert_eq!(records[0].published_date(), "03/05/21");
        assert!(records[0].has_thumbnail());
        assert_eq!(diagnostics.count("feed_assembled"), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty() {
        let (pipeline, diagnostics) = pipeline(StaticFetch::new().with_status(FEED_URL, 503));

        assert!(pipeline.fetch_feed(FEED_URL).await.is_empty());
        assert_eq!(diagnostics.count("feed_fetch_failed"), 1);
        assert_eq!(diagnostics.count("feed_assembled"), 0);

        assert!(matches!(
            pipeline.try_fetch_feed(FEED_URL).await,
            Err(FeedError::BadStatus(503))
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_is_empty() {
        let fetch = Arc::new(StaticFetch::new());
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let pipeline = FeedPipeline::new(fetch.clone(), Locale::us(), diagnostics.clone());

        assert!(pipeline.fetch_feed("content.guardianapis.com/search").await.is_empty());
        assert!(matches!(
            pipeline.try_fetch_feed("").await,
            Err(FeedError::InvalidUrl(_))
        ));
        assert_eq!(diagnostics.count("feed_fetch_failed"), 1);
        assert!(fetch.requested().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty() {
        let fetch = StaticFetch::new().with_body(FEED_URL, r#"{"message": "API rate limit exceeded"}"#);
        let (pipeline, diagnostics) = pipeline(fetch);

        assert!(pipeline.fetch_feed(FEED_URL).await.is_empty());
        assert_eq!(diagnostics.count("malformed_response"), 1);
        assert_eq!(diagnostics.count("feed_assembled"), 0);
        assert!(matches!(
            pipeline.try_fetch_feed(FEED_URL).await,
            Err(FeedError::MalformedResponse(_))
        ));
    }
}
