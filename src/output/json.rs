//! JSON document writer
//!
//! Writes the `website_info` document with two-space indentation. Non-ASCII
//! text is written as UTF-8 rather than `\u` escapes.

use crate::output::pages::CrawlOutput;
use crate::output::traits::{OutputError, OutputResult, OutputWriter};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the crawl document to a file, creating parent directories
#[derive(Debug, Clone)]
pub struct JsonFileWriter {
    path: PathBuf,
}

impl JsonFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for JsonFileWriter {
    fn write(&self, output: &CrawlOutput) -> OutputResult<()> {
        write_json(output, &self.path)
    }
}

/// Serializes `output` to `path`
///
/// # Arguments
///
/// * `output` - The finished crawl document
/// * `path` - Destination file; missing parent directories are created
///
/// # Returns
///
/// * `Ok(())` - Document written and flushed
/// * `Err(OutputError)` - Directory creation, serialization or write failed
pub fn write_json(output: &CrawlOutput, path: &Path) -> OutputResult<()> {
    let with_path = |source: std::io::Error| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(with_path)?;
    }

    let file = File::create(path).map_err(with_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, output)?;
    writer.write_all(b"\n").map_err(with_path)?;
    writer.flush().map_err(with_path)?;

    tracing::debug!(
        "Wrote {} sites / {} pages to {}",
        output.len(),
        output.total_pages(),
        path.display()
    );

    Ok(())
}
