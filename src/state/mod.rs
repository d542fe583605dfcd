//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the running / draining / done lifecycle of one site crawl

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
