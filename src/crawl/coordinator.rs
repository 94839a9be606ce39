// src/crawl/coordinator.rs
// =============================================================================
// Runs one crawl from start to finish.
//
// How it works:
// 1. Put the seed URL in a fresh frontier
// 2. Ask the sink to create the output destination
// 3. Create one fetcher per worker and spawn the workers
// 4. Wait until the frontier is drained (empty queue, nothing in flight),
//    or until every worker has died
// 5. Close the frontier and wait for every worker to stop
// 6. Return a summary of what happened
//
// Only steps 2 and 3 can fail the whole run. Once workers are running, every
// error belongs to a single page and ends up in the summary instead.
//
// Rust concepts:
// - Arc: every worker holds a reference-counted pointer to the shared state
// - JoinHandle: awaiting it waits for a spawned task to finish
// - Trait objects (Arc<dyn Sink>): the coordinator doesn't care which sink
// =============================================================================

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use super::frontier::{Frontier, VisitedSet};
use super::job::CrawlJob;
use super::report::{CrawlReport, CrawlSummary};
use super::worker::{CrawlContext, Worker};
use super::CrawlError;
use crate::extract::ContentExtractor;
use crate::fetch::{FetcherFactory, PageFetcher};
use crate::sink::Sink;

// Crawls everything reachable from `job.seed` within scope
//
// Parameters:
//   job: what to crawl; consumed, so a job can only run once
//   fetchers: builds one page fetcher per worker
//   extractor: turns pages into text + links (shared by all workers)
//   sink: stores page text (shared by all workers)
//
// Returns: a CrawlSummary, or a CrawlError if the crawl could not start
pub async fn run<M>(
    job: CrawlJob,
    fetchers: &M,
    extractor: Arc<dyn ContentExtractor>,
    sink: Arc<dyn Sink>,
) -> Result<CrawlSummary, CrawlError>
where
    M: FetcherFactory,
{
    let frontier = Frontier::new();
    frontier.enqueue(job.seed.clone());

    sink.ensure_destination().await.map_err(CrawlError::Destination)?;

    let mut started = Vec::with_capacity(job.workers);
    for worker in 0..job.workers {
        match fetchers.create().await {
            Ok(fetcher) => started.push(fetcher),
            Err(source) => {
                // Don't leave browsers running behind us
                for mut fetcher in started {
                    fetcher.shutdown().await;
                }
                return Err(CrawlError::WorkerStart { worker, source });
            }
        }
    }

    info!("Starting crawl of {} with {} worker(s)", job.seed, job.workers);

    let ctx = Arc::new(CrawlContext {
        job,
        frontier,
        visited: VisitedSet::new(),
        extractor,
        sink,
        report: CrawlReport::default(),
    });

    let handles: Vec<_> = started
        .into_iter()
        .enumerate()
        .map(|(id, fetcher)| tokio::spawn(Worker::new(id, fetcher, Arc::clone(&ctx)).run()))
        .collect();

    // Workers only return after close(), unless they panicked. If they all
    // die first the queue can never drain, so stop waiting for it.
    let workers = join_all(handles);
    tokio::pin!(workers);

    let results = tokio::select! {
        _ = ctx.frontier.wait_drained() => {
            ctx.frontier.close();
            workers.await
        }
        results = &mut workers => {
            error!(
                "Every crawl worker stopped early, {} URL(s) left in the queue",
                ctx.frontier.len()
            );
            ctx.frontier.close();
            results
        }
    };

    for result in results {
        if let Err(e) = result {
            error!("Crawl worker ended abnormally: {}", e);
        }
    }

    info!("Crawl finished, {} URL(s) visited", ctx.visited.len());
    Ok(ctx.report.summary(&ctx.job))
}
