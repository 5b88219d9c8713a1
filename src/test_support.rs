//! In-memory fetcher for unit tests

use std::collections::HashMap;
use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbImage};
use parking_lot::Mutex;

use crate::error::{FeedError, Result};
use crate::http_client::{parse_url, HttpFetch};

enum Canned {
    Body(Bytes),
    Status(u16),
}

/// Serves canned responses by exact URL; unknown URLs answer 404
#[derive(Default)]
pub struct StaticFetch {
    responses: HashMap<String, Canned>,
    requested: Mutex<Vec<String>>,
}

impl StaticFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Bytes>) -> Self {
        self.responses.insert(url.to_string(), Canned::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    /// URLs requested so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl HttpFetch for StaticFetch {
    async fn get(&self, url: &str) -> Result<Bytes> {
        parse_url(url)?;
        self.requested.lock().push(url.to_string());

        match self.responses.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FeedError::BadStatus(*status)),
            None => Err(FeedError::BadStatus(404)),
        }
    }
}

/// A solid-colour PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode test png");
    buffer.into_inner()
}
