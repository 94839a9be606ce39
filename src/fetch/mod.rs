// src/fetch/mod.rs
// =============================================================================
// This module loads pages for the crawler.
//
// Submodules:
// - browser: renders pages in headless Chrome (JavaScript runs first)
// - http: plain HTTP GET, for sites that need no script execution
//
// Each crawl worker owns exactly one PageFetcher. A FetcherFactory creates
// them when the crawl starts, one per worker.
//
// Rust concepts:
// - Traits: a shared interface for different fetcher implementations
// - async_trait: lets trait methods be async and usable from spawned tasks
// - Associated types: each factory says which fetcher type it builds
// =============================================================================

mod browser;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use browser::{BrowserFactory, BrowserOptions};
pub use http::HttpFactory;

/// Default time a page gets to finish loading.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A fully loaded page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The URL we asked for (used as the base for relative links)
    pub url: String,
    /// The page's HTML after scripts have run
    pub html: String,
}

/// Why a page could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page did not finish loading within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("could not start fetcher: {0}")]
    Startup(String),
}

#[async_trait]
pub trait PageFetcher: Send {
    /// Loads `url` and returns its content once dynamic loading is done.
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, FetchError>;

    /// Releases the underlying handle (browser process, connections...).
    async fn shutdown(&mut self) {}
}

#[async_trait]
pub trait FetcherFactory: Send + Sync {
    type Fetcher: PageFetcher + 'static;

    async fn create(&self) -> Result<Self::Fetcher, FetchError>;
}
