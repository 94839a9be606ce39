// src/crawl/scope.rs
// =============================================================================
// Decides whether a discovered link should be crawled.
//
// Order of checks:
// 1. include pattern (if set) must match
// 2. exclude pattern (if set) must NOT match
// 3. the crawl mode must accept the link
//
// This is a pure function: no locks, no shared state, so every worker can
// call it at the same time.
//
// Rust concepts:
// - match on an enum: the compiler makes sure every CrawlMode is handled
// - Option chaining with ? inside helper functions
// =============================================================================

use url::Url;

use super::job::{CrawlMode, ScopeFilters};

// Returns true if `candidate` is eligible to be enqueued
//
// Parameters:
//   seed: the (normalized) seed URL of the run
//   candidate: an absolute URL found on a crawled page
//   mode: which scope rule to apply
//   filters: include/exclude regexes
//
// Example:
//   seed = "https://example.com/a", mode = Default
//   "https://example.com/a/b" -> true
//   "https://example.com/x"   -> false
pub fn is_in_scope(seed: &str, candidate: &str, mode: CrawlMode, filters: &ScopeFilters) -> bool {
    if let Some(include) = &filters.include {
        if !include.is_match(candidate) {
            return false;
        }
    }

    if let Some(exclude) = &filters.exclude {
        if exclude.is_match(candidate) {
            return false;
        }
    }

    match mode {
        CrawlMode::Default => candidate.starts_with(seed),
        CrawlMode::HostOnly => match (host_of(seed), host_of(candidate)) {
            (Some(seed_host), Some(host)) => seed_host == host,
            _ => false,
        },
        CrawlMode::Subdomains => match (host_of(seed), host_of(candidate)) {
            (Some(seed_host), Some(host)) => registrable_domain(&seed_host) == registrable_domain(&host),
            _ => false,
        },
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_owned)
}

// Last two dot-separated labels of a host.
// "blog.example.com" -> "example.com", "localhost" -> "localhost".
// Not a public suffix lookup: "a.example.co.uk" -> "co.uk".
fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    labels[labels.len().saturating_sub(2)..].join(".")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a free function instead of a method?
//    - It has no state of its own
//    - Everything it needs comes in through the parameters
//    - That makes it trivial to test and safe to call from many tasks
//
// 2. What does match (a, b) do?
//    - Matches on a tuple of two values at once
//    - (Some(x), Some(y)) only matches when both hosts were found
//    - The _ arm catches every other combination (fail closed)
//
// 3. What is saturating_sub?
//    - Subtraction that stops at 0 instead of underflowing
//    - 1usize.saturating_sub(2) == 0, so a one-label host keeps its label
// -----------------------------------------------------------------------------
