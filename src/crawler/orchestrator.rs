//! Multi-site orchestration
//!
//! Runs one `CrawlController` per configured site and folds the results into
//! a single `CrawlOutput`. Sites run one after another unless
//! `parallel-sites` is set; either way the document lists them in
//! configuration order.

use crate::config::Config;
use crate::crawler::controller::{CrawlController, SiteCrawl};
use crate::crawler::extractor::{Extractor, HtmlExtractor};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::output::{CrawlOutput, CrawlStatistics};
use crate::GleanerError;
use chrono::Utc;
use std::sync::Arc;

/// The result of a whole run
#[derive(Debug, Clone)]
pub struct CrawlRun {
    pub output: CrawlOutput,
    pub statistics: CrawlStatistics,
}

/// Crawls every configured site
pub struct Orchestrator {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
}

impl Orchestrator {
    /// Creates an orchestrator with explicit fetcher and extractor
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Creates an orchestrator using the HTTP fetcher and HTML extractor
    pub fn from_config(config: Config) -> Result<Self, GleanerError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent)?;
        Ok(Self::new(config, Arc::new(fetcher), Arc::new(HtmlExtractor)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls all sites and aggregates their pages
    pub async fn run(&self) -> CrawlRun {
        let started_at = Utc::now();

        let controllers = self.config.sites.iter().map(|site| {
            CrawlController::new(
                site.clone(),
                self.config.crawler.clone(),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.extractor),
            )
        });

        let crawls: Vec<SiteCrawl> = if self.config.crawler.parallel_sites {
            tracing::info!("Crawling {} sites in parallel", self.config.sites.len());
            futures::future::join_all(controllers.map(CrawlController::run)).await
        } else {
            let mut crawls = Vec::with_capacity(self.config.sites.len());
            for controller in controllers {
                crawls.push(controller.run().await);
            }
            crawls
        };

        let mut output = CrawlOutput::new();
        let mut reports = Vec::with_capacity(crawls.len());
        for crawl in crawls {
            output.insert(crawl.report.site.clone(), crawl.pages);
            reports.push(crawl.report);
        }

        let statistics = CrawlStatistics {
            started_at,
            finished_at: Utc::now(),
            sites: reports,
        };

        tracing::info!(
            "Crawl finished: {} sites, {} pages ({} failed)",
            statistics.sites.len(),
            statistics.total_pages(),
            statistics.total_failed()
        );

        CrawlRun { output, statistics }
    }
}
