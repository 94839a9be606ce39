// src/fetch/browser.rs
// =============================================================================
// A page fetcher backed by headless Chrome/Chromium.
//
// How it works:
// 1. Each worker launches its own browser with its own profile directory
// 2. The browser keeps one tab open and reuses it for every page
// 3. For each URL: navigate, then poll document.readyState until "complete"
// 4. Read the rendered HTML (after JavaScript has changed the DOM)
//
// The whole load is bounded by a timeout. A page that takes longer fails with
// FetchError::Timeout and the worker moves on.
//
// Rust concepts:
// - Background tasks: the DevTools event handler runs in its own tokio task
// - tokio::time::timeout: puts an upper bound on any future
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::{FetchError, FetcherFactory, PageFetcher, RenderedPage};

// How often we ask the page whether it has finished loading
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Settings shared by every browser the crawl launches.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit Chrome/Chromium binary. None lets chromiumoxide search for one.
    pub chrome_path: Option<PathBuf>,
    /// Upper bound for one page load
    pub timeout: Duration,
}

/// Launches one [`BrowserFetcher`] per worker.
#[derive(Debug)]
pub struct BrowserFactory {
    options: BrowserOptions,
    launched: AtomicUsize,
}

impl BrowserFactory {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            options,
            launched: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FetcherFactory for BrowserFactory {
    type Fetcher = BrowserFetcher;

    async fn create(&self) -> Result<BrowserFetcher, FetchError> {
        let index = self.launched.fetch_add(1, Ordering::Relaxed);
        BrowserFetcher::launch(&self.options, index).await
    }
}

/// One headless browser with a single reusable tab.
pub struct BrowserFetcher {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    timeout: Duration,
    profile_dir: PathBuf,
}

impl BrowserFetcher {
    // Starts a browser process and opens a blank tab
    //
    // Parameters:
    //   options: chrome path and page timeout
    //   index: used to give every browser its own profile directory
    //          (two Chrome processes cannot share one)
    pub async fn launch(options: &BrowserOptions, index: usize) -> Result<Self, FetchError> {
        let profile_dir =
            std::env::temp_dir().join(format!("site-scribe-{}-{}", std::process::id(), index));

        let mut builder = BrowserConfig::builder()
            .request_timeout(options.timeout)
            .user_data_dir(&profile_dir)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if let Some(path) = &options.chrome_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(FetchError::Startup)?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Startup(e.to_string()))?;

        // The browser only makes progress while its event handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    trace!("Browser handler error: {}", e);
                }
            }
            debug!("Browser handler task completed");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Startup(e.to_string()))?;

        info!("Launched browser #{} (profile {})", index, profile_dir.display());

        Ok(Self {
            browser,
            page,
            handler,
            timeout: options.timeout,
            profile_dir,
        })
    }

    // Navigates and waits until document.readyState is "complete"
    async fn load(&self, url: &str) -> Result<String, FetchError> {
        self.page.goto(url).await.map_err(navigation)?;

        loop {
            let state: String = self
                .page
                .evaluate("document.readyState")
                .await
                .map_err(navigation)?
                .into_value()
                .map_err(navigation)?;

            if state == "complete" {
                break;
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        self.page.content().await.map_err(navigation)
    }
}

fn navigation(error: impl std::fmt::Display) -> FetchError {
    FetchError::Navigation(error.to_string())
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, FetchError> {
        match tokio::time::timeout(self.timeout, self.load(url)).await {
            Ok(html) => Ok(RenderedPage {
                url: url.to_string(),
                html: html?,
            }),
            Err(_) => Err(FetchError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();

        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            debug!(
                "Could not remove browser profile {}: {}",
                self.profile_dir.display(),
                e
            );
        }
    }
}
