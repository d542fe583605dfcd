//! Crawl controller - the bounded crawl of a single site
//!
//! The controller is the only owner of the site's frontier, visited set and
//! page map. Workers are spawned tasks that fetch and extract one URL and hand
//! a `FetchResult` back; they never touch shared state. The controller loop:
//! - Dispatches queued tasks while fewer than `max_threads` are in flight
//! - Records each completion, then enqueues same-origin links one level deeper
//! - Pauses for the request delay after every completion
//! - Stops dispatching once the page budget is used or nothing is left

use crate::config::CrawlerConfig;
use crate::crawler::extractor::{ExtractError, Extractor};
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::output::{PageContent, SiteCrawlReport, SitePages};
use crate::state::CrawlPhase;
use crate::url::SiteOrigin;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Progress is logged every this many completed pages
const PROGRESS_INTERVAL: usize = 10;

/// The outcome of one worker, consumed once by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The URL as it was enqueued
    pub url: String,

    /// Depth the URL was enqueued at
    pub depth: u32,

    /// Extracted text, or the failure
    pub content: PageContent,

    /// Absolute links found on the page (empty on failure)
    pub links: Vec<String>,
}

impl FetchResult {
    /// Builds a failed result for `task`
    pub fn failed(task: CrawlTask, reason: impl std::fmt::Display) -> Self {
        Self {
            content: PageContent::unavailable(task.url.clone(), reason),
            url: task.url,
            depth: task.depth,
            links: Vec::new(),
        }
    }

    /// Returns true if text was extracted
    pub fn ok(&self) -> bool {
        self.content.is_ok()
    }
}

/// Everything one site crawl produced
#[derive(Debug, Clone)]
pub struct SiteCrawl {
    pub pages: SitePages,
    pub report: SiteCrawlReport,

    /// Every URL the frontier accepted; each one has an entry in `pages`
    pub visited: HashSet<String>,
}

/// Runs the bounded crawl of one seed URL
pub struct CrawlController {
    site: String,
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
}

impl CrawlController {
    /// Creates a controller for `site`
    ///
    /// # Arguments
    ///
    /// * `site` - The seed URL; also the key of the site in the output
    /// * `config` - Depth, budget, concurrency and timing limits
    /// * `fetcher` - Network transport shared by the workers
    /// * `extractor` - HTML extractor shared by the workers
    pub fn new(
        site: impl Into<String>,
        config: CrawlerConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            site: site.into(),
            config,
            fetcher,
            extractor,
        }
    }

    /// The seed URL this controller crawls
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Crawls the site to completion
    ///
    /// Never fails: fetch and parse errors become placeholder entries.
    pub async fn run(self) -> SiteCrawl {
        let start_time = Instant::now();
        let budget = self.config.max_pages_per_site.max(1) as usize;
        let max_threads = self.config.max_threads.max(1) as usize;
        let delay = self.config.request_delay();

        let origin = SiteOrigin::of(&self.site);
        if origin.is_none() {
            tracing::warn!(
                "Seed {} has no usable origin, links will not be followed",
                self.site
            );
        }

        let mut frontier = Frontier::new(self.config.max_depth, budget);
        let mut pages = SitePages::new();
        let mut in_flight = FuturesUnordered::new();
        let mut completed = 0usize;
        let mut links_enqueued = 0usize;
        let mut phase = CrawlPhase::Running;

        frontier.enqueue(&self.site, 0);
        tracing::info!(
            "Crawling {} (max depth {}, budget {}, {} workers)",
            self.site,
            self.config.max_depth,
            budget,
            max_threads
        );

        loop {
            // A completion may have refilled the frontier since the last pass
            phase = self.transition(
                phase,
                CrawlPhase::evaluate(completed, budget, frontier.len(), in_flight.len()),
            );
            if phase.can_dispatch() {
                while in_flight.len() < max_threads {
                    let Some(task) = frontier.dequeue() else {
                        break;
                    };
                    tracing::debug!("Dispatching {} (depth {})", task.url, task.depth);
                    in_flight.push(self.spawn_worker(task));
                }
            }

            phase = self.transition(
                phase,
                CrawlPhase::evaluate(completed, budget, frontier.len(), in_flight.len()),
            );
            if phase.is_terminal() {
                break;
            }

            let Some(result) = in_flight.next().await else {
                continue;
            };

            links_enqueued += self.handle_result(result, &mut frontier, &mut pages, origin.as_ref());
            completed += 1;

            if completed % PROGRESS_INTERVAL == 0 {
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress {}: {}/{} pages, {} in frontier, {:.2} pages/sec",
                    self.site,
                    completed,
                    budget,
                    frontier.len(),
                    rate
                );
            }

            let upcoming =
                CrawlPhase::evaluate(completed, budget, frontier.len(), in_flight.len());
            if !upcoming.is_terminal() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        // Done: nothing new is dispatched, but every started fetch is recorded
        let discarded = frontier.discard_pending();
        if discarded > 0 {
            tracing::debug!("Discarded {} queued tasks for {}", discarded, self.site);
        }
        while let Some(result) = in_flight.next().await {
            self.handle_result(result, &mut frontier, &mut pages, None);
        }

        let report = SiteCrawlReport {
            site: self.site.clone(),
            pages_ok: pages.ok_count(),
            pages_failed: pages.failed_count(),
            links_enqueued,
            discarded,
            max_depth_reached: pages.iter().map(|(_, r)| r.depth).max().unwrap_or(0),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Finished {}: {} pages ({} failed) in {:?}",
            self.site,
            report.total_pages(),
            report.pages_failed,
            report.elapsed
        );

        let visited = frontier.into_visited();
        for url in visited.iter().filter(|url| !pages.contains(url)) {
            tracing::warn!("{} was accepted but never recorded", url);
        }

        SiteCrawl {
            pages,
            report,
            visited,
        }
    }

    /// Moves to `next` if the transition is legal
    fn transition(&self, current: CrawlPhase, next: CrawlPhase) -> CrawlPhase {
        if current == next || !current.can_transition_to(next) {
            return current;
        }
        tracing::debug!("{}: {} -> {}", self.site, current, next);
        next
    }

    /// Records a worker result and enqueues its links
    ///
    /// Links are only followed when the page succeeded, is shallower than the
    /// maximum depth and shares the seed's origin. Returns the number of
    /// links accepted by the frontier.
    fn handle_result(
        &self,
        result: FetchResult,
        frontier: &mut Frontier,
        pages: &mut SitePages,
        origin: Option<&SiteOrigin>,
    ) -> usize {
        let FetchResult {
            url,
            depth,
            content,
            links,
        } = result;

        if let Some(reason) = content.reason() {
            tracing::warn!("Failed to retrieve {}: {}", url, reason);
        }
        let follow = content.is_ok() && depth < self.config.max_depth;

        if !pages.record(url.as_str(), depth, content) {
            tracing::warn!("Result for {} was already recorded", url);
        }

        let Some(origin) = origin.filter(|_| follow) else {
            return 0;
        };

        links
            .iter()
            .filter(|link| origin.contains(link))
            .filter(|link| frontier.enqueue(link, depth + 1).is_queued())
            .count()
    }

    /// Starts a worker task for `task`
    ///
    /// A panicking worker is turned into a failed result so the URL still
    /// gets an entry.
    fn spawn_worker(&self, task: CrawlTask) -> impl Future<Output = FetchResult> {
        let handle = tokio::spawn(process_task(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.extractor),
            task.clone(),
            self.config.request_timeout(),
        ));

        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => FetchResult::failed(task, format!("worker aborted: {}", e)),
            }
        }
    }
}

/// Fetches and extracts one URL
///
/// The fetch is additionally bounded by `timeout` here, so a transport that
/// ignores its timeout argument cannot stall the crawl.
pub async fn process_task(
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    task: CrawlTask,
    timeout: Duration,
) -> FetchResult {
    let fetched = tokio::time::timeout(timeout, fetcher.fetch(&task.url, timeout))
        .await
        .unwrap_or(Err(FetchError::Timeout));

    let payload = match fetched {
        Ok(payload) => payload,
        Err(e) => return FetchResult::failed(task, e),
    };

    tracing::debug!(
        "Fetched {} ({} {}, {} bytes)",
        task.url,
        payload.status_code,
        payload.content_type,
        payload.body.len()
    );
    // Links still resolve against the URL as enqueued
    if payload.final_url != task.url {
        tracing::debug!("{} redirected to {}", task.url, payload.final_url);
    }

    let base_url = match Url::parse(&task.url) {
        Ok(url) => url,
        Err(_) => {
            let reason = ExtractError::BaseUrl(task.url.clone());
            return FetchResult::failed(task, reason);
        }
    };

    match extractor.extract(&payload.body, &base_url) {
        Ok(extraction) => FetchResult {
            content: PageContent::Text(extraction.page_text()),
            links: extraction.links,
            url: task.url,
            depth: task.depth,
        },
        Err(e) => FetchResult::failed(task, e),
    }
}
