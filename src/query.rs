//! Query URL templating for the search endpoint

use url::Url;

use crate::error::Result;
use crate::http_client::parse_url;

/// Largest page the search endpoint serves
pub const MAX_PAGE_SIZE: u32 = 50;

/// Everything that goes into one search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub endpoint: String,
    pub api_key: String,
    pub query: Option<String>,
    pub tag: Option<String>,
    pub section: Option<String>,
    pub order_by: String,
    pub page_size: u32,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            endpoint: "https://content.guardianapis.com/search".to_string(),
            api_key: "test".to_string(),
            query: Some("physics AND NOT obituary".to_string()),
            tag: Some("science/physics|education/physics".to_string()),
            section: Some("science|technology|education|environment".to_string()),
            order_by: "newest".to_string(),
            page_size: 30,
        }
    }
}

impl FeedQuery {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            query: None,
            tag: None,
            section: None,
            ..Default::default()
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Renders the request URL. Thumbnails and contributor tags are always
    /// requested since the parser depends on them.
    pub fn to_url(&self) -> Result<Url> {
        let mut url = parse_url(&self.endpoint)?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = non_empty(&self.query) {
                pairs.append_pair("q", query);
            }
            if let Some(tag) = non_empty(&self.tag) {
                pairs.append_pair("tag", tag);
            }
            if let Some(section) = non_empty(&self.section) {
                pairs.append_pair("section", section);
            }
            pairs
                .append_pair("show-fields", "thumbnail")
                .append_pair("show-tags", "contributor")
                .append_pair("order-by", &self.order_by)
                .append_pair(
                    "page-size",
                    &self.page_size.clamp(1, MAX_PAGE_SIZE).to_string(),
                )
                .append_pair("api-key", &self.api_key);
        }

        Ok(url)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
