// src/extract/mod.rs
// =============================================================================
// This module turns a rendered page into plain text and a list of links.
//
// Submodules:
// - html: the scraper-based implementation used by the CLI
//
// Rust concepts:
// - Traits: the crawler only knows about ContentExtractor, not scraper
// - Send + Sync: one extractor is shared by every worker
// =============================================================================

mod html;

use thiserror::Error;

use crate::fetch::RenderedPage;

pub use html::HtmlExtractor;

/// What a page contains, as far as the crawler cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Visible text, one text node per line
    pub text: String,
    /// Absolute URLs of outgoing links, without duplicates, in page order
    pub links: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub trait ContentExtractor: Send + Sync {
    /// Extracts text and links. Relative links are resolved against `base_url`.
    fn extract(&self, page: &RenderedPage, base_url: &str) -> Result<Extracted, ExtractError>;
}
