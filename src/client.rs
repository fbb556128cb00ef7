//! HTTP wrapper around the comic site's endpoints.
//!
//! The site exposes two kinds of resources, both unauthenticated GETs:
//!
//! - `/info.0.json` and `/{n}/info.0.json` — JSON metadata for the newest
//!   comic and for comic `n` respectively.
//! - The image URL declared inside that metadata, plus an undocumented
//!   high-resolution variant reachable by inserting `_2x` before the file
//!   extension (`comic.png` → `comic_2x.png`). Not every comic has one, so
//!   callers try the 2x URL first and fall back to the declared URL.
//!
//! Metadata endpoints return their body as raw text so the caller can persist
//! the response verbatim; parsing into [`ComicMetadata`] is a separate step.
//!
//! The base URL is configurable so tests can point the client at a local mock
//! server.

use serde::Deserialize;
use thiserror::Error;

/// Production endpoint root.
const DEFAULT_BASE_URL: &str = "https://xkcd.com";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image URL has no file extension: {0}")]
    NoExtension(String),
}

/// The slice of a comic's metadata this tool consumes. Responses carry more
/// fields (transcript, link, publication date); serde ignores them, but the
/// cache keeps the full body on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicMetadata {
    /// Required: the newest-comic lookup anchors the whole window on this
    /// field, so a body without it must fail the parse rather than default.
    pub num: u32,
    pub title: String,
    pub alt: String,
    pub img: String,
}

/// Blocking HTTP client for comic metadata and images.
pub struct ComicClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ComicClient {
    /// Client against the production site.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an arbitrary endpoint root (tests use a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("xkcd-kepub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Raw metadata body for the newest comic.
    pub fn latest_body(&self) -> Result<String, FetchError> {
        let url = format!("{}/info.0.json", self.base_url);
        Ok(self.http.get(url).send()?.error_for_status()?.text()?)
    }

    /// Raw metadata body for comic `number`.
    pub fn comic_body(&self, number: u32) -> Result<String, FetchError> {
        let url = format!("{}/{}/info.0.json", self.base_url, number);
        Ok(self.http.get(url).send()?.error_for_status()?.text()?)
    }

    /// Download an image as bytes. Non-2xx statuses are errors.
    pub fn image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self.http.get(url).send()?.error_for_status()?.bytes()?;
        Ok(bytes.to_vec())
    }

    /// Download the high-resolution variant of a declared image URL.
    pub fn image_2x(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.image(&variant_2x_url(url)?)
    }
}

/// Derive the `_2x` variant URL by inserting the suffix before the file
/// extension. URLs without an extension have no 2x convention.
pub fn variant_2x_url(url: &str) -> Result<String, FetchError> {
    match url.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => {
            Ok(format!("{stem}_2x.{ext}"))
        }
        _ => Err(FetchError::NoExtension(url.to_string())),
    }
}
