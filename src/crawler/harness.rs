//! Crawl harness - top-level orchestration
//!
//! The harness owns the renderer session, the visited set and the accumulated
//! records for the whole run. It drives the paginator, hands every new detail
//! link to the detail scraper and isolates per-item failures:
//! - A detail page that fails is logged and skipped
//! - A listing page that fails ends the run but keeps what was gathered
//! - The renderer is closed on every exit path

use crate::config::Config;
use crate::crawler::detail::DetailScraper;
use crate::crawler::links::{collect_links, LinkFilter};
use crate::crawler::pager::Paginator;
use crate::extract::Record;
use crate::renderer::{any_present, RenderError, Renderer};
use crate::state::{PagerState, VisitedSet};
use crate::DredgeError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The listing page with this index yielded no links
    Exhausted { page: u32 },

    /// The page cap was reached; `page` is the last page processed
    Capped { page: u32 },

    /// The item limit was reached
    LimitReached { limit: u32 },

    /// A listing page could not be loaded
    ListingFailed { page: u32, reason: String },
}

impl Termination {
    /// Returns true if the listing was walked to its natural end
    pub fn is_natural(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { page } => write!(f, "listing exhausted at page {}", page),
            Self::Capped { page } => write!(f, "page cap reached after page {}", page),
            Self::LimitReached { limit } => write!(f, "item limit of {} reached", limit),
            Self::ListingFailed { page, reason } => {
                write!(f, "listing page {} failed: {}", page, reason)
            }
        }
    }
}

/// A detail page that produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub url: String,
    pub reason: String,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Records in the order their detail pages were visited
    pub records: Vec<Record>,
    pub failures: Vec<ItemFailure>,
    pub termination: Termination,
    /// Listing pages that were loaded
    pub pages_visited: u32,
    /// Distinct detail URLs attempted
    pub urls_visited: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Drives one crawl over a single renderer session
pub struct CrawlHarness<R: Renderer> {
    config: Arc<Config>,
    renderer: R,
    visited: VisitedSet,
    records: Vec<Record>,
    failures: Vec<ItemFailure>,
    pages_visited: u32,
    detail_fetches: u64,
}

impl<R: Renderer> CrawlHarness<R> {
    /// Creates a harness that takes ownership of the renderer
    pub fn new(config: Config, renderer: R) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
            visited: VisitedSet::new(),
            records: Vec::new(),
            failures: Vec::new(),
            pages_visited: 0,
            detail_fetches: 0,
        }
    }

    /// Runs the crawl to completion
    ///
    /// The renderer is closed before this returns, whether the crawl ended
    /// normally, hit the item limit, lost a listing page or failed outright.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The run ended; records may be partial
    /// * `Err(DredgeError)` - The start URL could not be parsed
    pub async fn run(mut self) -> Result<CrawlOutcome, DredgeError> {
        let started_at = Utc::now();
        tracing::info!("Starting crawl of {}", self.config.listing.start_url);

        let result = self.crawl().await;

        if let Err(e) = self.renderer.close().await {
            tracing::warn!("Failed to close renderer: {}", e);
        }

        let termination = result?;
        let outcome = CrawlOutcome {
            records: self.records,
            failures: self.failures,
            termination,
            pages_visited: self.pages_visited,
            urls_visited: self.visited.len(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl finished ({}): {} records, {} failures in {:?}",
            outcome.termination,
            outcome.records.len(),
            outcome.failures.len(),
            outcome.elapsed().to_std().unwrap_or_default()
        );

        Ok(outcome)
    }

    /// Main loop over listing pages
    async fn crawl(&mut self) -> Result<Termination, DredgeError> {
        let config = Arc::clone(&self.config);
        let mut pager = Paginator::from_config(&config.listing)?;
        let filter = LinkFilter::from_config(&config.listing);
        let scraper = DetailScraper::new(&config.fields, &config.detail);

        let mut ready_selectors = config.listing.ready_selectors.clone();
        ready_selectors.extend(config.listing.link_selectors.iter().cloned());

        if let Some(limit) = self.limit_reached() {
            return Ok(Termination::LimitReached { limit });
        }

        loop {
            let page = match pager.state() {
                PagerState::AtPage(page) => page,
                PagerState::Exhausted => {
                    return Ok(Termination::Exhausted {
                        page: pager.last_page().unwrap_or(config.listing.page_start),
                    });
                }
                PagerState::Capped => {
                    return Ok(Termination::Capped {
                        page: pager.last_page().unwrap_or(config.listing.page_start),
                    });
                }
            };

            let page_url = pager.page_url(page);
            tracing::info!("--- Listing page {} --- {}", page, page_url);

            let links = match self.renderer.navigate(&page_url).await {
                Ok(()) => {
                    self.pages_visited += 1;
                    self.wait_for_listing(&ready_selectors).await;

                    let base = self
                        .renderer
                        .current_url()
                        .cloned()
                        .unwrap_or_else(|| page_url.clone());
                    collect_links(
                        &self.renderer,
                        &config.listing.link_selectors,
                        &base,
                        &filter,
                    )
                }
                Err(RenderError::Status { status, .. }) if status == 404 || status == 410 => {
                    tracing::info!("Listing page {} returned {}; treating as empty", page, status);
                    Vec::new()
                }
                Err(e) => {
                    tracing::error!("Listing page {} failed: {}", page, e);
                    return Ok(Termination::ListingFailed {
                        page,
                        reason: e.to_string(),
                    });
                }
            };

            tracing::info!("Found {} links", links.len());

            // A terminal state is reported at the top of the loop, after the
            // links of a capped page have been processed.
            pager.record_links(links.len());

            for link in links {
                if let Some(limit) = self.limit_reached() {
                    tracing::info!("Item limit reached ({})", limit);
                    return Ok(Termination::LimitReached { limit });
                }

                if !self.visited.insert(&link) {
                    tracing::debug!("Skipping already visited {}", link);
                    continue;
                }

                self.scrape_one(&scraper, &link).await;
            }

            if let Some(limit) = self.limit_reached() {
                tracing::info!("Item limit reached ({})", limit);
                return Ok(Termination::LimitReached { limit });
            }

            if !pager.state().is_terminal() {
                let delay = config.politeness.page_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Waits for the listing to render; a timeout is logged, not fatal
    async fn wait_for_listing(&mut self, selectors: &[String]) {
        let listing = &self.config.listing;
        if listing.ready_selectors.is_empty() {
            return;
        }

        let ready = self
            .renderer
            .wait_until(&any_present(selectors), listing.ready_timeout())
            .await;
        if !ready {
            tracing::warn!("Listing content not detected (continuing)");
        }

        let settle = listing.settle();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
    }

    /// Scrapes one detail page, recording either its record or its failure
    async fn scrape_one(&mut self, scraper: &DetailScraper<'_>, url: &Url) {
        if self.detail_fetches > 0 {
            let delay = self.config.politeness.item_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        self.detail_fetches += 1;

        tracing::info!("Scraping {}", url);
        match scraper.scrape(&mut self.renderer, url).await {
            Ok(record) => self.records.push(record),
            Err(e) => {
                tracing::warn!("Failed to scrape {}: {}", url, e);
                self.failures.push(ItemFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// The configured limit, if the record count has reached it
    fn limit_reached(&self) -> Option<u32> {
        self.config
            .item_limit
            .filter(|&limit| self.records.len() >= limit as usize)
    }
}
