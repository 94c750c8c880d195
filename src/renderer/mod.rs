//! Page renderer adapter
//!
//! This module contains the page-loading side of the crawler:
//! - `Renderer`/`PageView`: the capability the crawl pipeline consumes
//! - `Document`: a parsed HTML page with element queries and visible text
//! - `HttpRenderer`: a renderer that fetches pages over HTTP

mod document;
#[cfg(test)]
pub(crate) mod fake;
mod http;
mod traits;

pub use document::{visible_text, Document};
pub use http::{build_http_client, HttpRenderer, DEFAULT_USER_AGENT};
pub use traits::{
    any_present, body_present, Element, PageView, ReadyPredicate, RenderError, RenderResult,
    Renderer,
};
