//! Feed Parser
//!
//! Turns the search endpoint's JSON into [`NewsRecord`]s in two passes:
//!
//! 1. [`extract_entries`] is pure: it navigates the envelope, filters to
//!    article entries and normalizes their fields, keeping the thumbnail URL.
//! 2. [`FeedParser::resolve_thumbnails`] fetches the thumbnails concurrently
//!    and attaches them, preserving source order.
//!
//! Envelope malformation discards the whole batch. A malformed entry only
//! drops that entry. An absent `tags` means no authors and an absent `fields`
//! means no thumbnail; either key present with the wrong shape skips the entry.
//! A scalar of the wrong type only blanks that field.

use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::debug;

use crate::date::{self, Locale};
use crate::diagnostics::{DiagnosticEvent, Diagnostics, SharedDiagnostics};
use crate::error::Result;
use crate::image_fetcher::ImageFetcher;
use crate::schemas::{contributor_name, NewsRecord, SearchEntry, SearchEnvelope, ARTICLE_TYPE};

/// Appended to the first contributor when an entry has several
pub const AUTHOR_OTHERS_SUFFIX: &str = ", ...";

/// An article entry after the pure pass, before its thumbnail is resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    /// Position in `response.results`
    pub index: usize,
    pub record: NewsRecord,
    pub thumbnail_url: Option<String>,
}

/// First contributor's name, plus a marker if there are more.
/// Tags after the first are only counted.
pub fn author_line(tags: &[Value]) -> String {
    let Some(first) = tags.first() else {
        return String::new();
    };

    let mut author = contributor_name(first).unwrap_or_default();
    if tags.len() > 1 {
        author.push_str(AUTHOR_OTHERS_SUFFIX);
    }
    author
}

/// Pure pass over the response text.
///
/// Empty text yields an empty list. An envelope without a `response.results`
/// array is a `MalformedResponse` and no entries are returned.
pub fn extract_entries(
    text: &str,
    locale: &Locale,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<ParsedEntry>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let envelope: SearchEnvelope = serde_json::from_str(text)?;

    debug!(
        results = envelope.response.results.len(),
        status = ?envelope.response.status,
        total = ?envelope.response.total,
        "Decoded feed envelope"
    );

    Ok(envelope
        .response
        .results
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| parse_entry(index, entry, locale, diagnostics))
        .collect())
}

fn parse_entry(
    index: usize,
    entry: Value,
    locale: &Locale,
    diagnostics: &dyn Diagnostics,
) -> Option<ParsedEntry> {
    let skip = |reason: String| {
        diagnostics.report(DiagnosticEvent::EntrySkipped { index, reason });
        None
    };

    let Some(object) = entry.as_object() else {
        return skip("entry is not an object".to_string());
    };

    let kind = object.get("type").and_then(Value::as_str);
    if kind != Some(ARTICLE_TYPE) {
        diagnostics.report(DiagnosticEvent::NonArticleSkipped {
            index,
            kind: kind.map(str::to_string),
        });
        return None;
    }

    if let Some(reason) = shape_violation(object) {
        return skip(reason.to_string());
    }

    let entry: SearchEntry = match serde_json::from_value(entry) {
        Ok(entry) => entry,
        Err(e) => return skip(e.to_string()),
    };

    let published_date = match entry.web_publication_date.as_deref() {
        Some(raw) => {
            let formatted = date::normalize(raw, locale);
            if formatted.is_empty() {
                diagnostics.report(DiagnosticEvent::DateUnparsable {
                    index,
                    raw: raw.to_string(),
                });
            }
            formatted
        }
        None => String::new(),
    };

    let author = author_line(entry.tags.as_deref().unwrap_or_default());

    let thumbnail_url = entry
        .fields
        .and_then(|fields| fields.thumbnail)
        .filter(|url| !url.trim().is_empty());

    let record = NewsRecord::new(
        entry.web_title.unwrap_or_default(),
        author,
        published_date,
        entry.section_name.unwrap_or_default(),
        entry.web_url.unwrap_or_default(),
    );

    Some(ParsedEntry {
        index,
        record,
        thumbnail_url,
    })
}

// serde would accept a sequence for a struct, so check container kinds up front
fn shape_violation(object: &Map<String, Value>) -> Option<&'static str> {
    match object.get("tags") {
        None | Some(Value::Null) | Some(Value::Array(_)) => {}
        Some(_) => return Some("tags is not an array"),
    }
    match object.get("fields") {
        None | Some(Value::Null) | Some(Value::Object(_)) => None,
        Some(_) => Some("fields is not an object"),
    }
}

pub struct FeedParser {
    images: ImageFetcher,
    locale: Locale,
    diagnostics: SharedDiagnostics,
}

impl FeedParser {
    pub fn new(images: ImageFetcher, locale: Locale, diagnostics: SharedDiagnostics) -> Self {
        Self {
            images,
            locale,
            diagnostics,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Pure pass, see [`extract_entries`]
    pub fn extract(&self, text: &str) -> Result<Vec<ParsedEntry>> {
        extract_entries(text, &self.locale, self.diagnostics.as_ref())
    }

    /// Fetches every thumbnail concurrently and returns the records in
    /// entry order. Records whose thumbnail is unavailable are kept without one.
    pub async fn resolve_thumbnails(&self, entries: Vec<ParsedEntry>) -> Vec<NewsRecord> {
        let thumbnails = join_all(
            entries
                .iter()
                .map(|entry| self.images.fetch_image(entry.thumbnail_url.as_deref())),
        )
        .await;

        entries
            .into_iter()
            .zip(thumbnails)
            .map(|(entry, thumbnail)| {
                let mut record = entry.record;
                if let Some(thumbnail) = thumbnail {
                    record.attach_thumbnail(thumbnail);
                }
                record
            })
            .collect()
    }

    /// Both passes, with envelope failures surfaced as errors
    pub async fn try_parse(&self, text: &str) -> Result<Vec<NewsRecord>> {
        let entries = self.extract(text)?;
        Ok(self.resolve_thumbnails(entries).await)
    }

    /// Both passes, failing soft: a malformed envelope is reported and
    /// yields an empty list.
    pub async fn parse(&self, text: &str) -> Vec<NewsRecord> {
        match self.try_parse(text).await {
            Ok(records) => records,
            Err(e) => {
                self.diagnostics.report(DiagnosticEvent::MalformedResponse {
                    error: e.to_string(),
                });
                Vec::new()
            }
        }
    }
}
