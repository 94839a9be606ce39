// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - ValueEnum: lets clap parse "--mode host-only" straight into CrawlMode
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::crawl::{CrawlMode, DEFAULT_WORKERS};
use crate::fetch::DEFAULT_TIMEOUT_SECS;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "site-scribe",
    version = "0.1.0",
    about = "Crawl a website and save the text of every page",
    long_about = "site-scribe starts at a seed URL, renders each page in headless Chrome, \
                  saves its text to a .txt file and follows links that stay within scope. \
                  Pages are crawled by several workers at once."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com/docs)
    ///
    /// This is a positional argument (required, no flag needed)
    pub seed: String,

    /// Number of concurrent workers (each runs its own browser)
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Which links count as part of the site
    ///
    /// default    = link must start with the seed URL
    /// host-only  = link must be on exactly the same host
    /// subdomains = link may be on any subdomain of the seed's domain
    #[arg(long, value_enum, default_value_t = CrawlMode::Default)]
    pub mode: CrawlMode,

    /// Only follow links whose full URL matches this regex
    #[arg(long)]
    pub include: Option<String>,

    /// Never follow links whose full URL matches this regex
    ///
    /// Checked after --include, so exclude always wins
    #[arg(long)]
    pub exclude: Option<String>,

    /// Output directory (default: a folder named after the seed's host)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds a page gets to finish loading before it is skipped
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Use plain HTTP requests instead of a browser (no JavaScript)
    #[arg(long)]
    pub no_render: bool,

    /// Path to the Chrome/Chromium executable
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Print the crawl summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show debug logging (RUST_LOG overrides this)
    #[arg(short, long)]
    pub verbose: bool,
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[arg(long, env = "CHROMIUM_PATH")] do?
//    - The value can come from --chrome-path or from the environment
//    - The command-line flag wins if both are set
//
// 2. Why Option<String> for --include?
//    - The flag is optional; None means "no include filter"
//    - clap fills in Some(value) only when the flag is given
//
// 3. What is value_enum?
//    - Tells clap that CrawlMode implements ValueEnum
//    - Variant names become kebab-case values: HostOnly -> "host-only"
// -----------------------------------------------------------------------------
