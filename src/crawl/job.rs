// src/crawl/job.rs
// =============================================================================
// The description of one crawl run.
//
// A CrawlJob is built once at startup (from the CLI arguments) and then shared
// read-only by every worker. Nothing in here changes while the crawl runs.
//
// Rust concepts:
// - Enums as policies: CrawlMode is a closed set of scope rules
// - Validation in constructors: CrawlJob::new() refuses bad input up front
// =============================================================================

use std::path::PathBuf;

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;
use url::Url;

use super::CrawlError;
use crate::sink::slugify;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 5;

/// Which discovered links count as "the same site" as the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlMode {
    /// The link must start with the seed URL (plain text prefix)
    #[default]
    Default,
    /// The link's host must equal the seed's host exactly
    HostOnly,
    /// The link's host must end with the same two labels as the seed's host
    Subdomains,
}

/// Optional include/exclude regular expressions over full URLs.
///
/// Both are unanchored searches: `/diseases` matches anywhere in the URL.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilters {
    pub include: Option<Regex>,
    pub exclude: Option<Regex>,
}

impl ScopeFilters {
    /// Compiles the patterns, failing if either is not a valid regex
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, CrawlError> {
        Ok(Self {
            include: compile("include", include)?,
            exclude: compile("exclude", exclude)?,
        })
    }
}

fn compile(which: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, CrawlError> {
    pattern
        .map(|p| Regex::new(p).map_err(|source| CrawlError::InvalidPattern { which, source }))
        .transpose()
}

/// Everything the coordinator and workers need to know about a run.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    /// The seed, already parsed and re-serialized by the url crate
    pub seed: String,
    pub mode: CrawlMode,
    pub filters: ScopeFilters,
    pub workers: usize,
    /// Where the text files go
    pub output_dir: PathBuf,
}

impl CrawlJob {
    // Builds a job from user input
    //
    // Parameters:
    //   seed: the starting URL (must be absolute and have a host)
    //   output_dir: None means "a folder named after the seed's host"
    //
    // Errors:
    //   Invalid seed URL, a seed without a host, or zero workers
    pub fn new(
        seed: &str,
        mode: CrawlMode,
        filters: ScopeFilters,
        workers: usize,
        output_dir: Option<PathBuf>,
    ) -> Result<Self, CrawlError> {
        let parsed = Url::parse(seed).map_err(|source| CrawlError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| CrawlError::SeedWithoutHost(seed.to_string()))?;

        if workers == 0 {
            return Err(CrawlError::NoWorkers);
        }

        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(slugify(host)));

        Ok(Self {
            seed: parsed.to_string(),
            mode,
            filters,
            workers,
            output_dir,
        })
    }
}
