//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a run,
//! including per-site statistics and the pages that could not be retrieved.

use crate::output::pages::CrawlOutput;
use crate::output::stats::CrawlStatistics;
use crate::output::traits::OutputResult;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// At most this many failed pages are listed per site
const MAX_FAILURES_LISTED: usize = 50;

/// Generates a markdown summary and writes it to `output_path`
///
/// # Arguments
///
/// * `stats` - Run statistics
/// * `output` - The crawl document, used to list failed pages
/// * `config_hash` - Hash of the configuration file, if one was used
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    stats: &CrawlStatistics,
    output: &CrawlOutput,
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats, output, config_hash);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_summary(
    stats: &CrawlStatistics,
    output: &CrawlOutput,
    config_hash: Option<&str>,
) -> String {
    let mut md = String::new();

    md.push_str("# Site-Gleaner Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", stats.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        stats.duration().num_milliseconds() as f64 / 1000.0
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Sites**: {}\n", stats.sites.len()));
    md.push_str(&format!("- **Total Pages**: {}\n", stats.total_pages()));
    md.push_str(&format!("- **Failed Pages**: {}\n", stats.total_failed()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    // Per-site table
    md.push_str("## Sites\n\n");
    md.push_str("| Site | Pages | Failed | Max Depth | Seconds |\n");
    md.push_str("|------|-------|--------|-----------|---------|\n");
    for site in &stats.sites {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {:.1} |\n",
            site.site,
            site.total_pages(),
            site.pages_failed,
            site.max_depth_reached,
            site.elapsed.as_secs_f64()
        ));
    }
    md.push('\n');

    // Failed pages
    let failures: Vec<_> = output
        .sites()
        .flat_map(|(_, pages)| pages.iter())
        .filter_map(|(url, record)| record.content.reason().map(|reason| (url, reason)))
        .collect();

    if !failures.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");

        for (url, reason) in failures.iter().take(MAX_FAILURES_LISTED) {
            md.push_str(&format!("| {} | {} |\n", url, reason));
        }
        if failures.len() > MAX_FAILURES_LISTED {
            md.push_str(&format!(
                "\n... and {} more\n",
                failures.len() - MAX_FAILURES_LISTED
            ));
        }
        md.push('\n');
    }

    md
}
