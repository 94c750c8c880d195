//! Numeric pagination control
//!
//! The paginator walks page indexes upward from the configured start. The
//! listing ends naturally the first time a page yields no links; the configured
//! page cap is a separate safety stop.

use crate::config::ListingConfig;
use crate::state::PagerState;
use crate::url::with_page_param;
use url::Url;

/// Drives the numeric page sequence of one listing
#[derive(Debug, Clone)]
pub struct Paginator {
    /// Listing URL with the page parameter removed
    base: Url,
    param: String,
    start: u32,
    max_pages: u32,
    state: PagerState,
    last_page: Option<u32>,
}

impl Paginator {
    /// Creates a paginator positioned at `start`
    ///
    /// # Arguments
    ///
    /// * `start_url` - Listing entry URL; any page parameter on it is dropped
    /// * `param` - Name of the page query parameter
    /// * `start` - First page index
    /// * `max_pages` - Exclusive upper bound on the page index
    pub fn new(start_url: &Url, param: &str, start: u32, max_pages: u32) -> Self {
        let state = if start < max_pages {
            PagerState::AtPage(start)
        } else {
            PagerState::Capped
        };

        Self {
            base: with_page_param(start_url, param, None),
            param: param.to_string(),
            start,
            max_pages,
            state,
            last_page: None,
        }
    }

    /// Creates a paginator from listing configuration
    pub fn from_config(config: &ListingConfig) -> Result<Self, url::ParseError> {
        let start_url = Url::parse(&config.start_url)?;
        Ok(Self::new(
            &start_url,
            &config.page_param,
            config.page_start,
            config.max_pages,
        ))
    }

    /// Current state
    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Last page index whose link count was recorded
    pub fn last_page(&self) -> Option<u32> {
        self.last_page
    }

    /// Listing URL without the page parameter
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL of the listing page with the given index
    ///
    /// The start index maps to the base URL with the page parameter absent;
    /// every other index sets the parameter to its literal value.
    pub fn page_url(&self, page: u32) -> Url {
        if page == self.start {
            self.base.clone()
        } else {
            with_page_param(&self.base, &self.param, Some(page))
        }
    }

    /// Records how many links the current page yielded and advances
    ///
    /// Zero links ends traversal as `Exhausted`. Otherwise the paginator moves to
    /// the next index, or to `Capped` when that index would reach the cap.
    /// Calling this in a terminal state changes nothing.
    pub fn record_links(&mut self, link_count: usize) -> PagerState {
        let PagerState::AtPage(page) = self.state else {
            return self.state;
        };

        self.last_page = Some(page);
        self.state = if link_count == 0 {
            PagerState::Exhausted
        } else if page + 1 >= self.max_pages {
            PagerState::Capped
        } else {
            PagerState::AtPage(page + 1)
        };

        tracing::debug!(
            "Page {} yielded {} links; pager now {}",
            page,
            link_count,
            self.state
        );
        self.state
    }
}
