//! Frontier of pending crawl tasks for one site
//!
//! This module handles:
//! - FIFO (breadth-first) ordering of `(url, depth)` tasks
//! - The visited set, filled at enqueue time rather than fetch time
//! - Depth and page-budget guards on every enqueue
//!
//! Every enqueued URL reserves one slot of the page budget, so the frontier
//! never accepts more URLs than the crawl is allowed to record.

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The URL to fetch, exactly as discovered
    pub url: String,

    /// Link distance from the seed (the seed is 0)
    pub depth: u32,
}

/// What happened to an `enqueue` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Task accepted and URL marked visited
    Queued,
    /// URL was enqueued before
    AlreadyVisited,
    /// Depth is beyond the configured maximum
    TooDeep,
    /// Every budget slot is already reserved
    BudgetExhausted,
}

impl EnqueueOutcome {
    /// Returns true if the task was accepted
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// The per-site work queue and visited set
#[derive(Debug)]
pub struct Frontier {
    /// Pending tasks, oldest first
    queue: VecDeque<CrawlTask>,

    /// Every URL ever accepted by `enqueue`
    visited: HashSet<String>,

    /// Deepest depth that may be enqueued
    max_depth: u32,

    /// Maximum number of URLs this frontier will ever accept
    budget: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Tasks deeper than this are refused
    /// * `budget` - Maximum number of URLs accepted over the frontier's lifetime
    pub fn new(max_depth: u32, budget: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            max_depth,
            budget,
        }
    }

    /// Adds a task if the URL is new, shallow enough and the budget has room
    ///
    /// On success the URL is marked visited immediately, so a second
    /// discovery of the same URL while the first is queued or in flight is
    /// refused.
    pub fn enqueue(&mut self, url: &str, depth: u32) -> EnqueueOutcome {
        if self.visited.contains(url) {
            return EnqueueOutcome::AlreadyVisited;
        }

        if depth > self.max_depth {
            return EnqueueOutcome::TooDeep;
        }

        if self.visited.len() >= self.budget {
            return EnqueueOutcome::BudgetExhausted;
        }

        self.visited.insert(url.to_string());
        self.queue.push_back(CrawlTask {
            url: url.to_string(),
            depth,
        });

        EnqueueOutcome::Queued
    }

    /// Returns the oldest pending task, or None when the queue is empty
    pub fn dequeue(&mut self) -> Option<CrawlTask> {
        self.queue.pop_front()
    }

    /// Drops every pending task and returns how many were dropped
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Returns the number of pending tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether there are no pending tasks
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns whether `url` has ever been enqueued
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns the number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Consumes the frontier, returning every URL it ever accepted
    pub fn into_visited(self) -> HashSet<String> {
        self.visited
    }
}
