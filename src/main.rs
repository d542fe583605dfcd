//! Site-Gleaner main entry point
//!
//! This is the command-line interface for the Site-Gleaner text harvester.

use anyhow::Context;
use clap::Parser;
use site_gleaner::config::{load_config_with_hash, validate, Config};
use site_gleaner::crawler::crawl;
use site_gleaner::output::{generate_markdown_summary, print_statistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Gleaner: a bounded, polite site text harvester
///
/// Site-Gleaner crawls each configured site breadth-first, stays on the
/// site's origin, and writes the visible text of every page it visits to a
/// single JSON document.
#[derive(Parser, Debug)]
#[command(name = "site-gleaner")]
#[command(version)]
#[command(about = "A bounded, polite site text harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Add a seed site (may be repeated)
    #[arg(long = "site", value_name = "URL")]
    sites: Vec<String>,

    /// Override the JSON output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Write a markdown summary to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match load_cli_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(config, config_hash.as_deref()).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_gleaner=info,warn"),
            1 => EnvFilter::new("site_gleaner=debug,info"),
            2 => EnvFilter::new("site_gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Reads the config file (if any), applies command-line overrides and validates
fn load_cli_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            (Config::default(), None)
        }
    };

    config.sites.extend(cli.sites.iter().cloned());
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.clone());
    }

    validate(&config)?;
    Ok((config, config_hash))
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Site-Gleaner Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages per site: {}", config.crawler.max_pages_per_site);
    println!("  Max threads: {}", config.crawler.max_threads);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    println!(
        "  Sites: {}",
        if config.crawler.parallel_sites {
            "in parallel"
        } else {
            "one at a time"
        }
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Document: {}", config.output.path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        println!("  - {}", site);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch at most {} pages",
        config.sites.len() * config.crawler.max_pages_per_site as usize
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: Option<&str>) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of {} sites", config.sites.len());

    let summary_path = config.output.summary_path.clone();

    let run = match crawl(config).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(path) = summary_path {
        generate_markdown_summary(&run.statistics, &run.output, config_hash, Path::new(&path))
            .with_context(|| format!("writing summary to {}", path))?;
        tracing::info!("Summary written to {}", path);
    }

    print_statistics(&run.statistics);

    Ok(())
}
