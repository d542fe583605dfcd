//! Crawl statistics
//!
//! Each site crawl produces a `SiteCrawlReport`; the orchestrator gathers
//! them into `CrawlStatistics` for printing and the markdown summary.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Counters for one finished site crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCrawlReport {
    /// The configured seed URL
    pub site: String,

    /// Pages recorded with extracted text
    pub pages_ok: usize,

    /// Pages recorded with an error placeholder
    pub pages_failed: usize,

    /// Links accepted into the frontier (seed excluded)
    pub links_enqueued: usize,

    /// Queued tasks dropped when the crawl finished
    pub discarded: usize,

    /// Deepest depth recorded
    pub max_depth_reached: u32,

    /// Wall-clock time of the site crawl
    pub elapsed: Duration,
}

impl SiteCrawlReport {
    /// Returns the total number of pages recorded
    pub fn total_pages(&self) -> usize {
        self.pages_ok + self.pages_failed
    }
}

/// Statistics for a whole run
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sites: Vec<SiteCrawlReport>,
}

impl CrawlStatistics {
    /// Total pages recorded across all sites
    pub fn total_pages(&self) -> usize {
        self.sites.iter().map(SiteCrawlReport::total_pages).sum()
    }

    /// Total pages recorded as failed
    pub fn total_failed(&self) -> usize {
        self.sites.iter().map(|s| s.pages_failed).sum()
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_pages();
        if total == 0 {
            return 0.0;
        }
        ((total - self.total_failed()) as f64 / total as f64) * 100.0
    }

    /// Duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Sites crawled: {}", stats.sites.len());
    println!("  Pages recorded: {}", stats.total_pages());
    println!("  Failed pages: {}", stats.total_failed());
    println!(
        "  Duration: {:.1}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!("Sites:");
    for site in &stats.sites {
        println!(
            "  {}: {} ok, {} failed, depth {} ({:.1}s)",
            site.site,
            site.pages_ok,
            site.pages_failed,
            site.max_depth_reached,
            site.elapsed.as_secs_f64()
        );
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages extracted)",
        stats.success_rate(),
        stats.total_pages() - stats.total_failed(),
        stats.total_pages()
    );
}
