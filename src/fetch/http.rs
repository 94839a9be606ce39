// src/fetch/http.rs
// =============================================================================
// A page fetcher that does a plain HTTP GET.
//
// No JavaScript runs here, so pages that build their content in the browser
// come back mostly empty. Use it with --no-render for static sites, or when
// Chrome is not installed.
//
// Rust concepts:
// - Client reuse: one reqwest::Client per worker keeps its connection pool
// - Error categorization: reqwest errors are mapped to our FetchError
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{FetchError, FetcherFactory, PageFetcher, RenderedPage};

/// Builds one [`HttpFetcher`] per worker.
#[derive(Debug, Clone)]
pub struct HttpFactory {
    timeout: Duration,
}

impl HttpFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl FetcherFactory for HttpFactory {
    type Fetcher = HttpFetcher;

    async fn create(&self) -> Result<HttpFetcher, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Startup(e.to_string()))?;

        Ok(HttpFetcher {
            client,
            timeout: self.timeout,
        })
    }
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| categorize_error(e, self.timeout))?;

        Ok(RenderedPage {
            url: url.to_string(),
            html,
        })
    }
}

// Maps a reqwest error to the matching FetchError variant
fn categorize_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Navigation(error.to_string())
    }
}
