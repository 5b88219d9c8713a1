//! Thumbnail fetching
//!
//! A thumbnail is optional decoration: a missing URL, a failed request or an
//! undecodable body all end in `None`, never in an error for the caller.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::diagnostics::{DiagnosticEvent, SharedDiagnostics};
use crate::error::{FeedError, Result};
use crate::http_client::{parse_url, HttpFetch};
use crate::metrics::{self, STAGE_THUMBNAIL};
use crate::schemas::Thumbnail;

pub struct ImageFetcher {
    client: Arc<dyn HttpFetch>,
    diagnostics: SharedDiagnostics,
}

impl ImageFetcher {
    pub fn new(client: Arc<dyn HttpFetch>, diagnostics: SharedDiagnostics) -> Self {
        Self {
            client,
            diagnostics,
        }
    }

    /// Fetches and decodes one image
    pub async fn try_fetch(&self, url: &str) -> Result<Thumbnail> {
        let started = Instant::now();
        let body = self.client.get(url).await;
        metrics::record_fetch_latency(STAGE_THUMBNAIL, started.elapsed().as_secs_f64());

        let body = body?;

        // Decoding is CPU-bound, keep it off the runtime threads
        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&body))
            .await
            .map_err(|e| FeedError::MalformedResponse(format!("decode task failed: {}", e)))??;

        Ok(Thumbnail::new(image))
    }

    /// Resolves an optional thumbnail URL to a decoded image.
    ///
    /// Absent, blank or unparsable URLs return `None` without touching the
    /// network. Fetch and decode failures are reported to diagnostics.
    pub async fn fetch_image(&self, url: Option<&str>) -> Option<Thumbnail> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;

        if let Err(e) = parse_url(url) {
            debug!(url = %url, error = %e, "Ignoring unusable thumbnail URL");
            return None;
        }

        match self.try_fetch(url).await {
            Ok(thumbnail) => Some(thumbnail),
            Err(e) => {
                self.diagnostics
                    .report(DiagnosticEvent::thumbnail_failed(url, &e));
                None
            }
        }
    }
}
