//! Publication date normalization
//!
//! The API reports `webPublicationDate` as `yyyy-MM-ddTHH:mm:ssZ`. Records
//! carry a short date: `MM/dd/yy` for US locales, `dd/MM/yy` everywhere else.

use std::fmt;

use chrono::NaiveDateTime;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const US_FORMAT: &str = "%m/%d/%y";
const DEFAULT_FORMAT: &str = "%d/%m/%y";

/// Language/region pair, parsed from tags like `en_US`, `en-GB` or `fr_FR.UTF-8`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            region: region.map(|r| r.to_ascii_uppercase()),
        }
    }

    /// `en_US`
    pub fn us() -> Self {
        Self::new("en", Some("US"))
    }

    /// Parses a POSIX or BCP-47 style tag. Encoding and modifier suffixes
    /// (`.UTF-8`, `@euro`) are ignored.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.split(['.', '@']).next().unwrap_or_default().trim();
        let mut parts = tag.split(['_', '-']).filter(|p| !p.is_empty());

        let language = parts.next().unwrap_or_default();
        // Script subtags (`zh-Hant-TW`) are four letters; regions are two letters or three digits
        let region = parts.find(|p| p.len() == 2 || (p.len() == 3 && p.chars().all(|c| c.is_ascii_digit())));

        Self::new(language, region)
    }

    /// Locale of the running process: `LC_ALL`, then `LC_TIME`, then `LANG`
    pub fn from_env() -> Option<Self> {
        ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
            .map(|value| Self::parse(&value))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// True only for `en_US`; other languages in the US region (`es_US`)
    /// get the day-first format
    pub fn is_us(&self) -> bool {
        self.language == "en" && self.region.as_deref() == Some("US")
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::us()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

/// Parses the API timestamp. `None` on any deviation from the format.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, ISO_FORMAT).ok()
}

/// Converts an API timestamp into the locale's short date, or `""` if it
/// cannot be parsed.
pub fn normalize(raw: &str, locale: &Locale) -> String {
    match parse_timestamp(raw) {
        Some(timestamp) => {
            let format = if locale.is_us() { US_FORMAT } else { DEFAULT_FORMAT };
            timestamp.format(format).to_string()
        }
        None => String::new(),
    }
}
