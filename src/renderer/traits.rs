//! Renderer traits and types
//!
//! This module defines the capability the crawl pipeline consumes from a page
//! renderer: navigation, element queries, visible text, and bounded readiness
//! waits.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Navigation timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected an HTML page from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Renderer is closed")]
    Closed,
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// An owned snapshot of one element on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    text: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    /// Creates an element snapshot
    pub fn new(text: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// Visible text of the element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Value of the named attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Read-only queries over the currently loaded page
///
/// Queries never fail: a selector that matches nothing (or does not parse)
/// yields no elements.
pub trait PageView {
    /// All elements matching `selector`, in document order
    fn find_all(&self, selector: &str) -> Vec<Element>;

    /// The first element matching `selector`
    fn find_first(&self, selector: &str) -> Option<Element> {
        self.find_all(selector).into_iter().next()
    }

    /// The page's full visible text
    fn full_visible_text(&self) -> String;
}

/// A readiness check over the loaded page
pub type ReadyPredicate<'a> = dyn for<'p> Fn(&'p dyn PageView) -> bool + 'a;

/// A stateful page renderer owned by one crawl
///
/// The renderer is used strictly sequentially, so its futures are not required
/// to be `Send`.
#[async_trait(?Send)]
pub trait Renderer: PageView {
    /// Loads `url`, replacing the current page
    ///
    /// A failed navigation leaves no page loaded.
    async fn navigate(&mut self, url: &Url) -> RenderResult<()>;

    /// URL of the loaded page after redirects
    fn current_url(&self) -> Option<&Url>;

    /// Waits until `predicate` holds for the loaded page or `timeout` elapses
    ///
    /// Returns whether the predicate held. A timeout is not an error; the caller
    /// decides whether to proceed.
    async fn wait_until(&mut self, predicate: &ReadyPredicate<'_>, timeout: Duration) -> bool;

    /// Releases the renderer's resources
    async fn close(&mut self) -> RenderResult<()>;
}

/// Readiness predicate: any of `selectors` is present
pub fn any_present(selectors: &[String]) -> impl Fn(&dyn PageView) -> bool + '_ {
    move |page: &dyn PageView| selectors.iter().any(|s| page.find_first(s).is_some())
}

/// Readiness predicate: the document body is present
pub fn body_present(page: &dyn PageView) -> bool {
    page.find_first("body").is_some()
}
