//! # xkcd-kepub
//!
//! Bundles a window of xkcd comics into a single Kobo-ready `.kepub.epub`
//! archive. The remote site is the data source: the newest comic number
//! anchors a contiguous window of comics, each comic is fetched (or served
//! from the on-disk cache), rendered to an XHTML page, and packed together
//! with static assets into an EPUB container.
//!
//! # Architecture: Fetch → Render → Pack
//!
//! ```text
//! 1. Window    latest comic number  →  [first, last] bounds
//! 2. Fetch     comic numbers        →  cached metadata + images (32 workers)
//! 3. Pack      rendered pages       →  output.kepub.epub  →  output path
//! ```
//!
//! Two layers of caching keep re-runs cheap:
//!
//! - **Per-comic cache**: metadata JSON and the downloaded image are written
//!   to the cache directory on first fetch and reused forever after. A cache
//!   entry is never refreshed or invalidated.
//! - **Run marker**: the (first, last) bounds of the last successful build are
//!   persisted next to the built archive. When a run computes the same bounds,
//!   the previous archive is copied to the output untouched — no fetching, no
//!   rendering, no zip assembly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | CLI/environment configuration, read once at startup |
//! | [`client`] | HTTP wrapper around the comic site's JSON and image endpoints |
//! | [`cache`] | Cache directory layout and the run marker |
//! | [`fetch`] | Per-comic fetch with placeholder degradation — never fails the batch |
//! | [`render`] | Maud templates: comic pages and the three EPUB index documents |
//! | [`pool`] | Fixed-size worker pool that returns results in input order |
//! | [`pipeline`] | Window computation, short-circuit check, fan-out, assembly |
//! | [`book`] | Zip-based EPUB container writer |
//! | [`output`] | Console summary formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! All markup — comic pages, the OPF package document, the NCX, the EPUB3
//! navigation document — is generated with [Maud](https://maud.lambda.xyz/),
//! a compile-time HTML macro system. Malformed markup is a build error, all
//! interpolation is auto-escaped (comic titles and alt text are arbitrary
//! remote strings), and there is no template directory to ship.
//!
//! ## Degrade, Never Abort
//!
//! A single dead comic must not sink a 300-comic batch. Every failure mode in
//! the per-comic path (metadata fetch, JSON parse, image download, image
//! decode) degrades to a fixed placeholder record and the batch continues.
//! The one exception is the newest-comic lookup that anchors the window: if
//! that fails there is nothing to build, and the run aborts.
//!
//! ## Order From the Pool, Not After It
//!
//! Comics appear in the book newest-first. The worker pool guarantees that
//! results come back in input order — each worker records its result into a
//! preallocated slot by index — so downstream stages never re-sort.

pub mod book;
pub mod cache;
pub mod client;
pub mod config;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod render;
