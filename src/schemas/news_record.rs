//! NewsRecord Schema
//!
//! The normalized, display-ready form of one article entry.

use image::{DynamicImage, GenericImageView};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A decoded thumbnail bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    image: DynamicImage,
}

impl Thumbnail {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

// Pixels are never serialized, only the dimensions
impl Serialize for Thumbnail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (width, height) = self.image.dimensions();
        let mut state = serializer.serialize_struct("Thumbnail", 2)?;
        state.serialize_field("width", &width)?;
        state.serialize_field("height", &height)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    title: String,
    author: String,
    published_date: String,
    section: String,
    link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<Thumbnail>,
}

impl NewsRecord {
    pub fn new(
        title: String,
        author: String,
        published_date: String,
        section: String,
        link: String,
    ) -> Self {
        Self {
            title,
            author,
            published_date,
            section,
            link,
            thumbnail: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn published_date(&self) -> &str {
        &self.published_date
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }

    /// Sets the thumbnail slot. The slot is write-once: returns `false` and
    /// keeps the existing image if one is already attached.
    pub fn attach_thumbnail(&mut self, thumbnail: Thumbnail) -> bool {
        if self.thumbnail.is_some() {
            return false;
        }
        self.thumbnail = Some(thumbnail);
        true
    }
}
