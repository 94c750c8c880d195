//! Detail link collection from a listing page
//!
//! Every link selector is evaluated independently and the results are unioned.
//! Links are resolved against the listing page URL, filtered, deduplicated and
//! returned in lexical order so that re-runs over an unchanged page visit items
//! in the same order.

use crate::config::ListingConfig;
use crate::renderer::PageView;
use crate::url::{resolve_href, strip_query};
use std::collections::BTreeSet;
use url::Url;

/// Post-resolution link filtering
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    /// Only keep links whose absolute URL contains this substring
    pub must_contain: Option<String>,

    /// Drop query strings before deduplication
    pub strip_query: bool,
}

impl LinkFilter {
    /// Builds the filter configured for a listing
    pub fn from_config(config: &ListingConfig) -> Self {
        Self {
            must_contain: config.link_must_contain.clone(),
            strip_query: config.strip_link_query,
        }
    }

    /// Applies the filter; None means the link is dropped
    fn apply(&self, mut url: Url) -> Option<Url> {
        if self.strip_query {
            strip_query(&mut url);
        }

        match &self.must_contain {
            Some(needle) if !url.as_str().contains(needle.as_str()) => None,
            _ => Some(url),
        }
    }
}

/// Collects detail page URLs from a rendered listing page
///
/// # Arguments
///
/// * `page` - The loaded listing page
/// * `selectors` - Selectors matching anchor-like elements
/// * `base` - URL relative hrefs are resolved against
/// * `filter` - Post-resolution filtering
///
/// # Returns
///
/// Absolute, deduplicated URLs in lexical order. Elements without a usable
/// `href` are skipped.
pub fn collect_links<P: PageView + ?Sized>(
    page: &P,
    selectors: &[String],
    base: &Url,
    filter: &LinkFilter,
) -> Vec<Url> {
    let mut links = BTreeSet::new();

    for selector in selectors {
        let mut matched = 0usize;
        for element in page.find_all(selector) {
            matched += 1;
            let Some(href) = element.attribute("href") else {
                continue;
            };

            if let Some(url) = resolve_href(href, base).and_then(|url| filter.apply(url)) {
                links.insert(url);
            }
        }
        tracing::trace!("Selector '{}' matched {} elements", selector, matched);
    }

    links.into_iter().collect()
}
