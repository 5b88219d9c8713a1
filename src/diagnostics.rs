//! Diagnostics Collaborator
//!
//! Failures inside the pipeline never reach the caller as errors; they are
//! reported here instead. A [`Diagnostics`] implementation is passed into the
//! fetchers, the parser and the pipeline at construction, so nothing relies
//! on a process-wide logger.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::metrics;

/// Something worth reporting that happened during one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// The feed request itself failed (URL, network or status)
    FeedFetchFailed { url: String, error: String },
    /// The envelope could not be navigated to `response.results`
    MalformedResponse { error: String },
    /// A single entry had the wrong shape and was dropped
    EntrySkipped { index: usize, reason: String },
    /// A well-formed entry whose type is not "article"
    NonArticleSkipped { index: usize, kind: Option<String> },
    /// `webPublicationDate` present but not in the expected format
    DateUnparsable { index: usize, raw: String },
    /// Thumbnail fetch or decode failed; the record keeps no image
    ThumbnailFailed { url: String, error: String },
    /// A run finished with this many records
    FeedAssembled { records: usize },
}

impl DiagnosticEvent {
    /// Metric label for this event
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticEvent::FeedFetchFailed { .. } => "feed_fetch_failed",
            DiagnosticEvent::MalformedResponse { .. } => "malformed_response",
            DiagnosticEvent::EntrySkipped { .. } => "entry_skipped",
            DiagnosticEvent::NonArticleSkipped { .. } => "non_article_skipped",
            DiagnosticEvent::DateUnparsable { .. } => "date_unparsable",
            DiagnosticEvent::ThumbnailFailed { .. } => "thumbnail_failed",
            DiagnosticEvent::FeedAssembled { .. } => "feed_assembled",
        }
    }

    pub(crate) fn feed_fetch_failed(url: &str, error: &FeedError) -> Self {
        DiagnosticEvent::FeedFetchFailed {
            url: url.to_string(),
            error: error.to_string(),
        }
    }

    pub(crate) fn thumbnail_failed(url: &str, error: &FeedError) -> Self {
        DiagnosticEvent::ThumbnailFailed {
            url: url.to_string(),
            error: error.to_string(),
        }
    }
}

/// Sink for diagnostic events
pub trait Diagnostics: Send + Sync {
    fn report(&self, event: DiagnosticEvent);
}

/// Shared handle passed between components
pub type SharedDiagnostics = Arc<dyn Diagnostics>;

/// Default sink: structured log line plus a Prometheus counter
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl TracingDiagnostics {
    pub fn shared() -> SharedDiagnostics {
        Arc::new(Self)
    }
}

impl Diagnostics for TracingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        metrics::record_event(event.name());

        match &event {
            DiagnosticEvent::FeedFetchFailed { url, error } => {
                warn!(url = %url, error = %error, "Problem making the feed request");
            }
            DiagnosticEvent::MalformedResponse { error } => {
                warn!(error = %error, "Problem parsing the feed response, discarding batch");
            }
            DiagnosticEvent::EntrySkipped { index, reason } => {
                warn!(index = index, reason = %reason, "Skipping malformed entry");
            }
            DiagnosticEvent::NonArticleSkipped { index, kind } => {
                debug!(index = index, kind = ?kind, "Skipping non-article entry");
            }
            DiagnosticEvent::DateUnparsable { index, raw } => {
                debug!(index = index, raw = %raw, "Unparsable publication date");
            }
            DiagnosticEvent::ThumbnailFailed { url, error } => {
                warn!(url = %url, error = %error, "Thumbnail unavailable");
            }
            DiagnosticEvent::FeedAssembled { records } => {
                metrics::record_records(*records as u64);
                info!(records = records, "Feed assembled");
            }
        }
    }
}

/// Keeps every event in memory, in report order
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events reported so far
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }

    /// Number of reported events with the given metric label
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        self.events.lock().push(event);
    }
}
