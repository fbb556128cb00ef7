//! Startup configuration.
//!
//! All knobs come from environment variables with CLI overrides, parsed once
//! in `main` and passed immutably to the pipeline. There is no config file:
//! three values cover everything this tool does.

use clap::Parser;
use std::path::PathBuf;

/// Command-line / environment configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "xkcd-kepub")]
#[command(about = "Bundle a window of xkcd comics into a Kobo-ready kepub archive")]
#[command(long_about = "\
Bundle a window of xkcd comics into a Kobo-ready kepub archive

Looks up the newest comic, selects the window of the most recent --total
comics, fetches each one (metadata + image) into the cache directory, and
packs the rendered pages into a single .kepub.epub file.

Fetched comics are cached forever: a comic already present in the cache
directory is never re-downloaded. If a run computes the same comic window as
the previous run, the previously built archive is reused byte-for-byte.")]
#[command(version)]
pub struct Config {
    /// Where to write the finished book
    #[arg(env = "XKCD_OUTPUT_DIR", default_value = "xkcd.kepub.epub")]
    pub output: PathBuf,

    /// How many comics to include, counting back from the newest.
    /// Values below 1 select every comic from #1 to the newest.
    #[arg(long, env = "XKCD_TOTAL_COMICS", default_value_t = 300)]
    pub total: i64,

    /// Directory for cached metadata, images, and the previous build
    #[arg(long, env = "XKCD_CACHE_DIR", default_value = "cache")]
    pub cache_dir: PathBuf,
}
