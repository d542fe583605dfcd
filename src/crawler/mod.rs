//! Crawler module for page fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - HTML text, image description and link extraction
//! - The per-site frontier with depth and page budgets
//! - The crawl controller and the multi-site orchestrator

mod controller;
mod extractor;
mod fetcher;
mod frontier;
mod orchestrator;

pub use controller::{process_task, CrawlController, FetchResult, SiteCrawl};
pub use extractor::{parse_html, ExtractError, Extraction, Extractor, HtmlExtractor};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher, Payload};
pub use frontier::{CrawlTask, EnqueueOutcome, Frontier};
pub use orchestrator::{CrawlRun, Orchestrator};

use crate::config::Config;
use crate::output::{JsonFileWriter, OutputWriter};
use crate::GleanerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Crawl every configured site
/// 3. Write the `website_info` document to the configured output path
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(CrawlRun)` - The document and run statistics
/// * `Err(GleanerError)` - The client could not be built or the document
///   could not be written
pub async fn crawl(config: Config) -> Result<CrawlRun, GleanerError> {
    let output_path = config.output.path.clone();
    let orchestrator = Orchestrator::from_config(config)?;

    let run = orchestrator.run().await;

    let writer = JsonFileWriter::new(&output_path);
    writer.write(&run.output)?;
    tracing::info!("Wrote {}", writer.path().display());

    Ok(run)
}
