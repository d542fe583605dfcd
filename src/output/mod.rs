//! Output module for crawl results
//!
//! This module handles:
//! - Aggregating per-URL results into `SitePages` and `CrawlOutput`
//! - Writing the `website_info` JSON document
//! - Recording crawl statistics and rendering a markdown summary

mod json;
mod markdown;
mod pages;
pub mod stats;
mod traits;

pub use json::{write_json, JsonFileWriter};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use pages::{CrawlOutput, PageContent, PageRecord, SitePages};
pub use stats::{print_statistics, CrawlStatistics, SiteCrawlReport};
pub use traits::{OutputError, OutputResult, OutputWriter};
