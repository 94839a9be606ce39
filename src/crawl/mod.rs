// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Features:
// - A shared FIFO frontier drained by N concurrent workers
// - Each URL is claimed exactly once (atomic visited set)
// - Scope rules decide which discovered links are followed
// - The run ends by itself once every reachable page has been processed
//
// Submodules:
// - job: what to crawl (seed, mode, filters, workers, output dir)
// - scope: the pure "should we follow this link?" check
// - frontier: the work queue and the visited set
// - worker: one crawl worker and its per-page steps
// - report: counters and the summary returned by run()
// - coordinator: starts workers, waits for the drain, shuts down
//
// Rust concepts:
// - Arc: shared ownership of the frontier across tasks
// - tokio::spawn: workers run in parallel on the multi-threaded runtime
// - thiserror: the errors that stop a crawl before it starts
// =============================================================================

mod coordinator;
mod frontier;
mod job;
mod report;
mod scope;
mod worker;

use thiserror::Error;

use crate::fetch::FetchError;
use crate::sink::WriteError;

pub use coordinator::run;
pub use job::{CrawlJob, CrawlMode, ScopeFilters, DEFAULT_WORKERS};
pub use report::{CrawlSummary, FailureStage};

/// Errors that abort a crawl before any page is fetched.
///
/// Failures on individual pages never show up here; they are logged and
/// collected in [`CrawlSummary::failures`].
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL has no host: {0}")]
    SeedWithoutHost(String),

    #[error("invalid {which} pattern: {source}")]
    InvalidPattern {
        which: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("could not prepare output destination: {0}")]
    Destination(#[source] WriteError),

    #[error("could not start worker {worker}: {source}")]
    WorkerStart {
        worker: usize,
        #[source]
        source: FetchError,
    },
}
