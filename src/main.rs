//! Dredge main entry point
//!
//! This is the command-line interface for the Dredge listing crawler.

use anyhow::{bail, Context};
use clap::Parser;
use dredge::config::{load_config_with_hash, validate, Config};
use dredge::crawler::{crawl, Paginator};
use dredge::output::{print_summary, CsvSink, OutputSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Dredge: a paginated listing crawler
///
/// Dredge walks a numerically paginated listing, visits every item's detail
/// page once, and extracts a fixed set of fields into a CSV table.
#[derive(Parser, Debug)]
#[command(name = "dredge")]
#[command(version)]
#[command(about = "A paginated listing crawler with fallback field extraction", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Output file (overrides output.path; .tsv writes tab-separated)
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Stop after this many records
    #[arg(short, long, value_name = "N")]
    limit: Option<u32>,

    /// Delay between listing pages, in seconds
    #[arg(long, value_name = "SECS")]
    page_delay: Option<f64>,

    /// Delay between detail pages, in seconds
    #[arg(long, value_name = "SECS")]
    item_delay: Option<f64>,

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

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    apply_overrides(&mut config, &cli)?;
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dredge=info,warn"),
            1 => EnvFilter::new("dredge=debug,info"),
            2 => EnvFilter::new("dredge=trace,debug"),
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

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(out) = &cli.out {
        config.output.path = out.clone();
    }
    if let Some(limit) = cli.limit {
        config.item_limit = Some(limit);
    }
    if let Some(secs) = cli.page_delay {
        config.politeness.page_delay_ms = seconds_to_millis(secs, "--page-delay")?;
    }
    if let Some(secs) = cli.item_delay {
        config.politeness.item_delay_ms = seconds_to_millis(secs, "--item-delay")?;
    }
    Ok(())
}

fn seconds_to_millis(secs: f64, flag: &str) -> anyhow::Result<u64> {
    if !secs.is_finite() || secs < 0.0 {
        bail!("{} must be a non-negative number of seconds, got {}", flag, secs);
    }
    Ok((secs * 1000.0).round() as u64)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let pager = Paginator::from_config(&config.listing).context("Invalid start URL")?;
    let listing = &config.listing;

    println!("=== Dredge Dry Run ===\n");

    println!("Listing:");
    println!("  First page: {}", pager.page_url(listing.page_start));
    println!("  Next page: {}", pager.page_url(listing.page_start + 1));
    println!(
        "  Pages: {} to {} at most",
        listing.page_start,
        listing.max_pages.saturating_sub(1)
    );
    println!("  Link selectors: {}", listing.link_selectors.join(" | "));
    if !listing.ready_selectors.is_empty() {
        println!("  Ready selectors: {}", listing.ready_selectors.join(" | "));
    }
    if let Some(needle) = &listing.link_must_contain {
        println!("  Links must contain: {}", needle);
    }

    println!("\nPoliteness:");
    println!("  Page delay: {}ms", config.politeness.page_delay_ms);
    println!("  Item delay: {}ms", config.politeness.item_delay_ms);
    match config.item_limit {
        Some(limit) => println!("  Item limit: {}", limit),
        None => println!("  Item limit: none"),
    }

    println!("\nFields ({}):", config.fields.len());
    for field in &config.fields {
        println!("  - {}", field.name);
        for strategy in &field.strategies {
            println!("    * {}", strategy);
        }
    }

    println!("\nOutput:");
    println!("  Path: {}", config.output.path.display());
    println!("  Columns: {}", config.output_columns().join(", "));

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let columns = config.output_columns();
    let mut sink = CsvSink::new(&config.output.path);

    tracing::info!(
        "Extracting {} fields from {}",
        config.fields.len(),
        config.listing.start_url
    );

    let outcome = crawl(config).await.context("Crawl failed")?;

    sink.write_records(&columns, &outcome.records)
        .with_context(|| format!("Failed to write {}", sink.path().display()))?;

    print_summary(&outcome);
    println!("Saved {} rows to {}", outcome.records.len(), sink.path().display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_millis() {
        assert_eq!(seconds_to_millis(0.7, "--page-delay").unwrap(), 700);
        assert_eq!(seconds_to_millis(0.0, "--page-delay").unwrap(), 0);
        assert!(seconds_to_millis(-1.0, "--page-delay").is_err());
        assert!(seconds_to_millis(f64::NAN, "--page-delay").is_err());
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from([
            "dredge",
            "listing.toml",
            "--out",
            "rows.tsv",
            "--limit",
            "5",
            "--page-delay",
            "1.5",
            "-vv",
        ]);
        assert_eq!(cli.config, PathBuf::from("listing.toml"));
        assert_eq!(cli.out, Some(PathBuf::from("rows.tsv")));
        assert_eq!(cli.limit, Some(5));
        assert_eq!(cli.page_delay, Some(1.5));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.dry_run);
    }
}
