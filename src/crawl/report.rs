// src/crawl/report.rs
// =============================================================================
// Counts what happened during a crawl.
//
// Workers record into a shared CrawlReport while the crawl runs; the
// coordinator turns it into a CrawlSummary at the end.
//
// #[derive(Serialize)] lets main.rs print the summary as JSON.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use super::job::{CrawlJob, CrawlMode};
use super::worker::PageError;

/// Which step of the per-page work failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Fetch,
    Extract,
    Write,
}

/// One page that could not be crawled.
#[derive(Debug, Clone, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub stage: FailureStage,
    pub message: String,
}

/// The result of a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: String,
    pub mode: CrawlMode,
    pub output_dir: PathBuf,
    /// Pages whose text was written
    pub pages_saved: usize,
    /// Queue entries dropped because the URL was already claimed
    pub duplicates_skipped: usize,
    pub failures: Vec<PageFailure>,
}

impl CrawlSummary {
    /// True if every claimed page was saved
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// Shared, thread-safe tally filled in by the workers
#[derive(Debug, Default)]
pub(crate) struct CrawlReport {
    saved: AtomicUsize,
    duplicates: AtomicUsize,
    failures: Mutex<Vec<PageFailure>>,
}

impl CrawlReport {
    pub(crate) fn record_saved(&self) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, url: &str, error: &PageError) {
        self.failures.lock().push(PageFailure {
            url: url.to_string(),
            stage: error.stage(),
            message: error.to_string(),
        });
    }

    pub(crate) fn summary(&self, job: &CrawlJob) -> CrawlSummary {
        CrawlSummary {
            seed: job.seed.clone(),
            mode: job.mode,
            output_dir: job.output_dir.clone(),
            pages_saved: self.saved.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates.load(Ordering::Relaxed),
            failures: self.failures.lock().clone(),
        }
    }
}
