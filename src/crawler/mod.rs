//! Crawler module for listing traversal and detail scraping
//!
//! This module contains the core crawling logic, including:
//! - Numeric pagination of the listing
//! - Detail link collection and filtering
//! - Per-item detail scraping
//! - Overall crawl orchestration with failure isolation

mod detail;
mod harness;
mod links;
mod pager;

pub use detail::DetailScraper;
pub use harness::{CrawlHarness, CrawlOutcome, ItemFailure, Termination};
pub use links::{collect_links, LinkFilter};
pub use pager::Paginator;

use crate::config::Config;
use crate::renderer::HttpRenderer;
use crate::DredgeError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the HTTP renderer session
/// 2. Walk the listing pages in order
/// 3. Scrape every new detail link into a record
/// 4. Close the renderer and report the outcome
///
/// # Arguments
///
/// * `config` - The validated run configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The run ended; see `termination` for why
/// * `Err(DredgeError)` - The renderer could not be created
///
/// # Example
///
/// ```no_run
/// use dredge::config::load_config;
/// use dredge::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("listing.toml"))?;
/// let outcome = crawl(config).await?;
/// println!("{} records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlOutcome, DredgeError> {
    let renderer = HttpRenderer::new(&config.renderer)?;
    CrawlHarness::new(config, renderer).run().await
}
