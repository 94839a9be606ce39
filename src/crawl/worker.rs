// src/crawl/worker.rs
// =============================================================================
// One crawl worker.
//
// A worker loops until the frontier is closed:
// 1. Take a URL from the frontier (waits if the queue is empty)
// 2. Claim it in the visited set; skip it if another worker already did
// 3. Fetch the page with this worker's own fetcher
// 4. Extract text and links
// 5. Save the text through the sink
// 6. Enqueue every in-scope link that has not been visited yet
//
// If step 3, 4 or 5 fails, the error is logged and recorded, and the worker
// moves on to the next URL. Nothing a single page does can stop the crawl.
//
// States: Idle -> Fetching -> Extracting -> Enqueueing -> Idle ... -> Stopped
//
// Rust concepts:
// - Generics: Worker<F> works with any PageFetcher
// - The ? operator with #[from]: each step's error converts into PageError
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::frontier::{Frontier, VisitedSet};
use super::job::CrawlJob;
use super::report::{CrawlReport, FailureStage};
use super::scope::is_in_scope;
use crate::extract::{ContentExtractor, ExtractError};
use crate::fetch::{FetchError, PageFetcher};
use crate::sink::{Sink, WriteError};

/// Where a worker is in its per-page cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Fetching,
    Extracting,
    Enqueueing,
    Stopped,
}

// Why one page failed
#[derive(Debug, Error)]
pub(crate) enum PageError {
    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Write(#[from] WriteError),
}

impl PageError {
    pub(crate) fn stage(&self) -> FailureStage {
        match self {
            PageError::Fetch(_) => FailureStage::Fetch,
            PageError::Extract(_) => FailureStage::Extract,
            PageError::Write(_) => FailureStage::Write,
        }
    }
}

// State shared by every worker of one run
pub(crate) struct CrawlContext {
    pub(crate) job: CrawlJob,
    pub(crate) frontier: Frontier,
    pub(crate) visited: VisitedSet,
    pub(crate) extractor: Arc<dyn ContentExtractor>,
    pub(crate) sink: Arc<dyn Sink>,
    pub(crate) report: CrawlReport,
}

/// A crawl worker that owns one page fetcher.
pub struct Worker<F> {
    id: usize,
    fetcher: F,
    ctx: Arc<CrawlContext>,
    state: WorkerState,
}

impl<F: PageFetcher> Worker<F> {
    pub(crate) fn new(id: usize, fetcher: F, ctx: Arc<CrawlContext>) -> Self {
        Self {
            id,
            fetcher,
            ctx,
            state: WorkerState::Idle,
        }
    }

    fn transition(&mut self, next: WorkerState) {
        trace!(worker = self.id, from = ?self.state, to = ?next, "worker state");
        self.state = next;
    }

    // Runs until the frontier is closed, then shuts the fetcher down
    pub async fn run(mut self) {
        // Our own handle, so the InFlight borrow doesn't lock up `self`
        let ctx = Arc::clone(&self.ctx);

        while let Some(item) = ctx.frontier.dequeue().await {
            self.visit(item.url()).await;
            self.transition(WorkerState::Idle);
            // `item` is dropped here, which marks it done
        }

        self.transition(WorkerState::Stopped);
        self.fetcher.shutdown().await;
        debug!(worker = self.id, "worker stopped");
    }

    async fn visit(&mut self, url: &str) {
        if !self.ctx.visited.claim(url) {
            trace!(worker = self.id, url, "already visited");
            self.ctx.report.record_duplicate();
            return;
        }

        match self.crawl_page(url).await {
            Ok(path) => {
                info!("Crawled: {} -> {}", url, path.display());
                self.ctx.report.record_saved();
            }
            Err(e) => {
                warn!("Error crawling {}: {}", url, e);
                self.ctx.report.record_failure(url, &e);
            }
        }
    }

    // Fetch, extract, save, then enqueue links. Returns the saved file path.
    async fn crawl_page(&mut self, url: &str) -> Result<PathBuf, PageError> {
        self.transition(WorkerState::Fetching);
        let page = self.fetcher.fetch(url).await?;

        self.transition(WorkerState::Extracting);
        let extracted = self.ctx.extractor.extract(&page, url)?;
        let path = self.ctx.sink.persist(url, &extracted.text).await?;

        self.transition(WorkerState::Enqueueing);
        self.enqueue_links(extracted.links);

        Ok(path)
    }

    fn enqueue_links(&self, links: Vec<String>) {
        let job = &self.ctx.job;
        let mut added = 0;

        for link in links {
            if is_in_scope(&job.seed, &link, job.mode, &job.filters) && !self.ctx.visited.contains(&link) {
                self.ctx.frontier.enqueue(link);
                added += 1;
            }
        }

        debug!(worker = self.id, added, queued = self.ctx.frontier.len(), "links enqueued");
    }
}
