//! Pipeline driver: window computation, short-circuit check, fan-out, pack.
//!
//! One run is four sequential steps bracketing a parallel middle:
//!
//! 1. Look up the newest comic number. This anchors the window, so there is
//!    no fallback — a failure here aborts the run.
//! 2. Compare the window bounds against the previous run's marker. On a
//!    match, copy the previously built archive to the output and stop.
//! 3. Fan the window out across the worker pool, newest first. Per-comic
//!    failures degrade inside [`fetch`](crate::fetch) and never abort.
//! 4. Pack the book, copy it to the output, overwrite the run marker.
//!
//! The marker is only written after a successful build and copy, so an
//! interrupted run leaves the previous marker intact and the next run
//! rebuilds.

use crate::book::{self, BookError};
use crate::cache::{CacheStore, RunMarker};
use crate::client::{ComicClient, ComicMetadata, FetchError};
use crate::config::Config;
use crate::fetch;
use crate::pool;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed fan-out for the fetch phase. Downloads are I/O bound, so this is
/// deliberately far above the core count.
const POOL_WORKERS: usize = 32;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("book assembly failed: {0}")]
    Book(#[from] BookError),
}

/// What a run did, for console reporting.
#[derive(Debug)]
pub struct RunSummary {
    pub first: u32,
    pub last: u32,
    /// True when the previous archive was reused without rebuilding.
    pub reused: bool,
    /// Comics that came back with placeholder content.
    pub degraded: u32,
    pub output: PathBuf,
}

/// Compute the window bounds for a run.
///
/// `last` is always the newest comic; `first` reaches back `total` comics but
/// never below 1. A `total` below 1 selects everything from comic #1 up.
pub fn window_bounds(latest: u32, total: i64) -> RunMarker {
    let first = if total < 1 {
        1
    } else {
        (i64::from(latest) + 1).saturating_sub(total).max(1) as u32
    };
    RunMarker {
        first,
        last: latest,
    }
}

/// Run the full pipeline against the production site.
pub fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    let store = CacheStore::open(&config.cache_dir)?;
    let client = ComicClient::new()?;
    run_with(&client, &store, config.total, &config.output)
}

/// Run the pipeline with explicit collaborators (tests inject a mock server
/// and a temp cache).
pub fn run_with(
    client: &ComicClient,
    store: &CacheStore,
    total: i64,
    output: &Path,
) -> Result<RunSummary, PipelineError> {
    // Fatal on failure: without the newest number there is no window.
    let latest_body = client.latest_body()?;
    let latest: ComicMetadata =
        serde_json::from_str(&latest_body).map_err(FetchError::from)?;
    std::fs::write(store.metadata_path(latest.num), &latest_body)?;

    let bounds = window_bounds(latest.num, total);

    if store.load_run_marker() == Some(bounds) {
        println!("No new comics to fetch, using cached output");
        std::fs::copy(store.archive_path(), output)?;
        return Ok(RunSummary {
            first: bounds.first,
            last: bounds.last,
            reused: true,
            degraded: 0,
            output: output.to_path_buf(),
        });
    }

    let numbers: Vec<u32> = (bounds.first..=bounds.last).rev().collect();
    let comics = pool::map_ordered(POOL_WORKERS, &numbers, |&number| {
        fetch::fetch_comic(client, store, number)
    });
    let degraded = comics.iter().filter(|c| c.is_degraded()).count() as u32;

    println!("Generating kepub...");
    let generated_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    book::build_book(&store.archive_path(), &comics, bounds, &generated_at)?;

    std::fs::copy(store.archive_path(), output)?;
    store.save_run_marker(&bounds)?;

    Ok(RunSummary {
        first: bounds.first,
        last: bounds.last,
        reused: false,
        degraded,
        output: output.to_path_buf(),
    })
}
