// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing)
// 3. Build the crawl job and its collaborators (fetcher, extractor, sink)
// 4. Run the crawl and print a summary
// 5. Exit with proper code (0 = all pages saved, 1 = some pages failed, 2 = error)
//
// Rust concepts used:
// - async/await: the crawl workers run concurrently on the tokio runtime
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Trait objects: Arc<dyn Sink> lets us swap implementations
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;       // src/cli.rs - command-line parsing
mod crawl;     // src/crawl/ - the crawl engine
mod extract;   // src/extract/ - HTML to text + links
mod fetch;     // src/fetch/ - loading pages (browser or plain HTTP)
mod sink;      // src/sink/ - writing page text to disk

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{CrawlJob, CrawlSummary, FailureStage, ScopeFilters};
use extract::{ContentExtractor, HtmlExtractor};
use fetch::{BrowserFactory, BrowserOptions, HttpFactory};
use sink::{FileSink, Sink};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a multi-threaded tokio runtime, so workers run in parallel
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every crawled page was saved
//   Ok(1) = the crawl finished but some pages failed
//   Err   = the crawl could not start
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let filters = ScopeFilters::new(cli.include.as_deref(), cli.exclude.as_deref())?;
    let job = CrawlJob::new(&cli.seed, cli.mode, filters, cli.workers, cli.output.clone())?;

    let file_sink = FileSink::new(&job.output_dir);
    println!("🔍 Crawling: {}", job.seed);
    println!("📁 Writing output to {}", file_sink.dir().display());

    let sink: Arc<dyn Sink> = Arc::new(file_sink);
    let extractor: Arc<dyn ContentExtractor> = Arc::new(HtmlExtractor::new());
    let timeout = Duration::from_secs(cli.timeout);

    // Each branch uses a different fetcher type, so run() is called twice
    let summary = if cli.no_render {
        crawl::run(job, &HttpFactory::new(timeout), extractor, sink).await
    } else {
        let options = BrowserOptions {
            chrome_path: cli.chrome_path.clone(),
            timeout,
        };
        crawl::run(job, &BrowserFactory::new(options), extractor, sink).await
    }
    .context("crawl could not start")?;

    print_summary(&summary, cli.json)?;

    if summary.is_clean() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Logs go to stderr so that --json output on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Prints the summary either as a table or JSON
fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
    } else {
        print_table(summary);
    }
    Ok(())
}

// Prints failed pages (if any) and the totals
fn print_table(summary: &CrawlSummary) {
    println!();

    if !summary.failures.is_empty() {
        println!("{:<60} {:<12} {:<30}", "URL", "STAGE", "MESSAGE");
        println!("{}", "=".repeat(102));

        for failure in &summary.failures {
            // Truncate URL if too long for display
            let url_display = if failure.url.chars().count() > 57 {
                format!("{}...", failure.url.chars().take(57).collect::<String>())
            } else {
                failure.url.clone()
            };

            println!(
                "{:<60} {:<12} {:<30}",
                url_display,
                format_stage(failure.stage),
                failure.message
            );
        }

        println!();
    }

    println!("📊 Summary:");
    println!("   ✅ Saved: {}", summary.pages_saved);
    println!("   ❌ Failed: {}", summary.failures.len());
    println!("   🔁 Duplicates skipped: {}", summary.duplicates_skipped);
    println!("   📁 Output: {}", summary.output_dir.display());
}

fn format_stage(stage: FailureStage) -> &'static str {
    match stage {
        FailureStage::Fetch => "🌐 FETCH",
        FailureStage::Extract => "📄 EXTRACT",
        FailureStage::Write => "💾 WRITE",
    }
}
