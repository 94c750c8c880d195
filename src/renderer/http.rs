//! HTTP renderer implementation
//!
//! This renderer fetches pages with a plain HTTP client and parses the returned
//! markup. It does not execute JavaScript, so it suits listings that are rendered
//! server-side. It handles:
//! - Building the HTTP client with user agent and timeouts
//! - Following redirects and tracking the final URL
//! - Error classification (timeouts, bad statuses, non-HTML content)
//! - Readiness checks against the document as served

use crate::config::RendererConfig;
use crate::renderer::document::Document;
use crate::renderer::traits::{
    Element, PageView, ReadyPredicate, RenderError, RenderResult, Renderer,
};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Default user agent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("dredge/", env!("CARGO_PKG_VERSION"));

/// Maximum redirect hops per navigation
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use dredge::config::RendererConfig;
/// use dredge::renderer::build_http_client;
///
/// let client = build_http_client(&RendererConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RendererConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.page_load_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer backed by an HTTP client and an HTML parser
pub struct HttpRenderer {
    client: Client,
    document: Document,
    current_url: Option<Url>,
    closed: bool,
}

impl HttpRenderer {
    /// Creates a renderer from configuration
    ///
    /// Failing here is the one condition that prevents a run from starting.
    pub fn new(config: &RendererConfig) -> RenderResult<Self> {
        let client = build_http_client(config).map_err(RenderError::Client)?;
        Ok(Self::with_client(client))
    }

    /// Creates a renderer around an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            document: Document::empty(),
            current_url: None,
            closed: false,
        }
    }

    /// Fetches and parses `url`; the loaded page is only replaced on success
    async fn load(&mut self, url: &Url) -> RenderResult<()> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !is_markup(&content_type) {
            return Err(RenderError::NotHtml {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.text().await.map_err(|e| classify(url, e))?;

        self.document = Document::parse(&body);
        self.current_url = Some(final_url);
        Ok(())
    }
}

/// Accepts HTML, XML and other text responses; a missing header is accepted
fn is_markup(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.contains("html")
        || content_type.contains("xml")
        || content_type.starts_with("text/")
}

/// Maps a transport error onto a renderer error
fn classify(url: &Url, error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout {
            url: url.to_string(),
        }
    } else {
        RenderError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

impl PageView for HttpRenderer {
    fn find_all(&self, selector: &str) -> Vec<Element> {
        self.document.find_all(selector)
    }

    fn full_visible_text(&self) -> String {
        self.document.full_visible_text()
    }
}

#[async_trait(?Send)]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, url: &Url) -> RenderResult<()> {
        if self.closed {
            return Err(RenderError::Closed);
        }

        self.document = Document::empty();
        self.current_url = None;

        tracing::debug!("Navigating to {}", url);
        self.load(url).await
    }

    fn current_url(&self) -> Option<&Url> {
        self.current_url.as_ref()
    }

    /// Checks the predicate once against the loaded document
    ///
    /// Served markup does not change without another request, so there is
    /// nothing to wait for and the timeout is not used. Re-fetching here would
    /// bypass the politeness delays between page loads.
    async fn wait_until(&mut self, predicate: &ReadyPredicate<'_>, _timeout: Duration) -> bool {
        if self.closed {
            return false;
        }
        predicate(&self.document)
    }

    async fn close(&mut self) -> RenderResult<()> {
        if !self.closed {
            self.closed = true;
            self.document = Document::empty();
            self.current_url = None;
            tracing::debug!("HTTP renderer closed");
        }
        Ok(())
    }
}
