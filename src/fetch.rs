//! Per-comic fetch: cache-or-download with placeholder degradation.
//!
//! This is the one stage that talks to the network per comic, and its
//! contract is that it never fails: whatever goes wrong — connection refused,
//! malformed JSON, a 404 on the image, an image the decoder can't read — the
//! result is a well-formed [`RenderedComic`] carrying placeholder content,
//! and the batch keeps going. Callers that care whether a comic is real or
//! degraded check [`RenderedComic::outcome`] instead of parsing logs.
//!
//! # Cache interaction
//!
//! Metadata and image are cached independently:
//!
//! - Metadata hit → parse the cached file. Miss → fetch and persist the
//!   response body verbatim. A degraded metadata record is *not* persisted,
//!   so the comic gets another chance on the next run.
//! - Image hit → reuse the file as-is. Miss → try the high-resolution `_2x`
//!   variant first, fall back to the declared URL, persist whichever
//!   succeeded. On total failure the embedded placeholder pixel is written
//!   into the cache slot.
//!
//! # Logical dimensions
//!
//! Pages embed each image at its logical (CSS pixel) size. When the 2x
//! variant was downloaded in this run, the decoded dimensions are halved
//! (integer division). A 2x image that is merely *reused* from the cache is
//! reported at its raw decoded size — whether it was 2x is not recorded
//! anywhere, so that information does not survive across runs.

use crate::cache::CacheStore;
use crate::client::{ComicClient, ComicMetadata, FetchError};
use crate::render;
use std::path::PathBuf;

/// Title substituted when metadata can't be fetched or parsed.
const PLACEHOLDER_TITLE: &str = "Error";

/// Alt text substituted when metadata can't be fetched or parsed.
const PLACEHOLDER_ALT: &str = "There was an error fetching this comic";

/// Inline 1×1 transparent PNG declared as the image of a placeholder record.
const PLACEHOLDER_IMAGE_URI: &str = "data:image/png;base64,\
    iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// The same 1×1 transparent PNG as bytes, written into the image cache slot
/// when no image can be downloaded or decoded.
const PLACEHOLDER_PNG: &[u8] = include_bytes!("../assets/placeholder.png");

/// How a comic's content was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Metadata and image both resolved, from cache or network.
    Complete,
    /// Placeholder content was substituted somewhere along the way.
    Degraded(DegradeReason),
}

/// What forced the placeholder. Carries the error text for console logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// Metadata fetch or parse failed; title, alt, and image are all placeholders.
    Metadata(String),
    /// Metadata was fine but the image couldn't be downloaded or decoded.
    Image(String),
}

/// A comic ready for packing: metadata, a cached image on disk, and the
/// rendered page. Produced once per run, never cached.
#[derive(Debug, Clone)]
pub struct RenderedComic {
    pub number: u32,
    pub title: String,
    pub alt: String,
    /// Archive entry name of the image (`{n}.png`).
    pub image_name: String,
    /// Where the image sits in the cache directory.
    pub image_path: PathBuf,
    /// Rendered XHTML page.
    pub html: String,
    pub outcome: FetchOutcome,
}

impl RenderedComic {
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Degraded(_))
    }
}

/// Fetch one comic, degrading to placeholders on any failure.
pub fn fetch_comic(client: &ComicClient, store: &CacheStore, number: u32) -> RenderedComic {
    println!("Fetching comic #{number}...");

    let (metadata, metadata_degraded) = load_metadata(client, store, number);
    let (width, height, image_degraded) = load_image(client, store, number, &metadata.img);

    // Metadata degradation wins when both went wrong: it implies the image
    // failure (the placeholder record declares an unfetchable data URI).
    let outcome = match (metadata_degraded, image_degraded) {
        (Some(reason), _) => FetchOutcome::Degraded(reason),
        (None, Some(reason)) => FetchOutcome::Degraded(reason),
        (None, None) => FetchOutcome::Complete,
    };
    if let FetchOutcome::Degraded(reason) = &outcome {
        eprintln!("Comic #{number} degraded: {reason:?}");
    }

    let image_name = format!("{number}.png");
    let html = render::comic_page(number, &metadata.title, &metadata.alt, &image_name, width, height);

    RenderedComic {
        number,
        title: metadata.title,
        alt: metadata.alt,
        image_name,
        image_path: store.image_path(number),
        html,
        outcome,
    }
}

/// Cached-or-fetched metadata. The placeholder record is returned in-memory
/// only; nothing is written to the cache on the degraded path.
fn load_metadata(
    client: &ComicClient,
    store: &CacheStore,
    number: u32,
) -> (ComicMetadata, Option<DegradeReason>) {
    match try_load_metadata(client, store, number) {
        Ok(metadata) => (metadata, None),
        Err(err) => (
            ComicMetadata {
                num: number,
                title: PLACEHOLDER_TITLE.to_string(),
                alt: PLACEHOLDER_ALT.to_string(),
                img: PLACEHOLDER_IMAGE_URI.to_string(),
            },
            Some(DegradeReason::Metadata(err.to_string())),
        ),
    }
}

fn try_load_metadata(
    client: &ComicClient,
    store: &CacheStore,
    number: u32,
) -> Result<ComicMetadata, FetchError> {
    let path = store.metadata_path(number);
    let body = if path.exists() {
        std::fs::read_to_string(&path)?
    } else {
        let body = client.comic_body(number)?;
        std::fs::write(&path, &body)?;
        body
    };
    Ok(serde_json::from_str(&body)?)
}

/// Cached-or-downloaded image plus its logical dimensions.
///
/// Returns (width, height, degradation). The placeholder path both writes
/// the fallback pixel into the cache slot and reports 1×1, so downstream
/// stages can treat the image file as always present.
fn load_image(
    client: &ComicClient,
    store: &CacheStore,
    number: u32,
    image_url: &str,
) -> (u32, u32, Option<DegradeReason>) {
    match try_load_image(client, store, number, image_url) {
        Ok((width, height)) => (width, height, None),
        Err(err) => {
            // Total failure: park the placeholder pixel in the cache slot so
            // the archive still gets an entry for this comic. If even that
            // write fails, assembly will later report the missing image, so
            // keep the cause on the degradation record.
            let mut reason = err.to_string();
            if let Err(write_err) = std::fs::write(store.image_path(number), PLACEHOLDER_PNG) {
                reason = format!("{reason}; placeholder write failed: {write_err}");
            }
            (1, 1, Some(DegradeReason::Image(reason)))
        }
    }
}

fn try_load_image(
    client: &ComicClient,
    store: &CacheStore,
    number: u32,
    image_url: &str,
) -> Result<(u32, u32), ImageError> {
    let path = store.image_path(number);
    let mut is_2x = false;

    if !path.exists() {
        let bytes = match client.image_2x(image_url) {
            Ok(bytes) => {
                is_2x = true;
                bytes
            }
            Err(_) => client.image(image_url)?,
        };
        std::fs::write(&path, bytes)?;
    }

    let (mut width, mut height) = image::image_dimensions(&path)?;
    if is_2x {
        width /= 2;
        height /= 2;
    }
    Ok((width, height))
}

/// Internal error type for the image path; only its message survives, inside
/// [`DegradeReason::Image`].
#[derive(Debug, thiserror::Error)]
enum ImageError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}
