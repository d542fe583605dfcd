//! Output writer traits and errors
//!
//! This module defines the trait interface for writing the final crawl
//! document and the errors writers report.

use crate::output::pages::CrawlOutput;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output writers
///
/// A writer persists the finished `CrawlOutput`. Failing to persist is the
/// one error a run must report to its caller.
pub trait OutputWriter {
    /// Writes the complete document
    fn write(&self, output: &CrawlOutput) -> OutputResult<()>;
}
