//! Wire format of the search endpoint
//!
//! Only the fields the parser reads are modelled; everything else is ignored.
//! Optional fields accept both absence and `null`. Scalar fields are read
//! leniently: numbers and booleans become text, any other JSON type is `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Entry type that produces a record
pub const ARTICLE_TYPE: &str = "article";

/// `{ "response": { "results": [...] } }`
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub response: SearchResponse,
}

/// Entries stay raw so each one can fail on its own
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub section_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub web_publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub web_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub web_url: Option<String>,
    /// Contributor tags, kept raw: only the first one is read
    #[serde(default)]
    pub tags: Option<Vec<Value>>,
    #[serde(default)]
    pub fields: Option<EntryFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryFields {
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

/// Text form of a scalar JSON value
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| scalar_text(&value)))
}

/// `webTitle` of a contributor tag, if the tag is an object carrying one
pub fn contributor_name(tag: &Value) -> Option<String> {
    tag.get("webTitle").and_then(scalar_text)
}
