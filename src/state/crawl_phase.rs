/// Lifecycle of a single site crawl
///
/// This module defines the phases a crawl controller moves through.
use std::fmt;

/// Represents the current phase of a site crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Tasks are being dispatched from the frontier
    Running,

    /// Frontier is empty but fetches are still in flight
    Draining,

    /// Budget reached or nothing left to do; no further dispatch
    Done,
}

impl CrawlPhase {
    /// Returns true if new fetches may be started in this phase
    pub fn can_dispatch(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Draining` may fall back to `Running` when a finishing worker
    /// discovers new links. `Done` is absorbing.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Done, Self::Done) => true,
            (Self::Done, _) => false,
            _ => true,
        }
    }

    /// Derives the phase from the controller's counters
    ///
    /// # Arguments
    ///
    /// * `completed` - Pages recorded so far
    /// * `budget` - The per-site page budget
    /// * `queued` - Tasks waiting in the frontier
    /// * `in_flight` - Fetches currently running
    pub fn evaluate(completed: usize, budget: usize, queued: usize, in_flight: usize) -> Self {
        if completed >= budget || (queued == 0 && in_flight == 0) {
            Self::Done
        } else if queued == 0 {
            Self::Draining
        } else {
            Self::Running
        }
    }

    /// Lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
