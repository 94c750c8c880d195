//! In-memory renderer for tests
//!
//! Serves static HTML keyed by URL, records every navigation and close, and can
//! be told to fail specific URLs.

use crate::renderer::document::Document;
use crate::renderer::traits::{
    Element, PageView, ReadyPredicate, RenderError, RenderResult, Renderer,
};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;
use url::Url;

/// What the fake renderer observed
#[derive(Debug, Default)]
pub struct FakeLog {
    pub navigations: Vec<String>,
    pub closes: u32,
}

impl FakeLog {
    /// How many times `url` was navigated to
    pub fn visits(&self, url: &str) -> usize {
        self.navigations.iter().filter(|u| *u == url).count()
    }
}

pub struct FakeRenderer {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    document: Document,
    current_url: Option<Url>,
    log: Rc<RefCell<FakeLog>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
            document: Document::empty(),
            current_url: None,
            log: Rc::new(RefCell::new(FakeLog::default())),
        }
    }

    /// Serves `html` at `url`
    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Makes navigation to `url` fail
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Shared handle on the navigation log
    pub fn log(&self) -> Rc<RefCell<FakeLog>> {
        Rc::clone(&self.log)
    }
}

impl PageView for FakeRenderer {
    fn find_all(&self, selector: &str) -> Vec<Element> {
        self.document.find_all(selector)
    }

    fn full_visible_text(&self) -> String {
        self.document.full_visible_text()
    }
}

#[async_trait(?Send)]
impl Renderer for FakeRenderer {
    async fn navigate(&mut self, url: &Url) -> RenderResult<()> {
        self.log.borrow_mut().navigations.push(url.to_string());
        self.document = Document::empty();
        self.current_url = None;

        if self.failing.contains(url.as_str()) {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: "scripted failure".to_string(),
            });
        }

        match self.pages.get(url.as_str()) {
            Some(html) => {
                self.document = Document::parse(html);
                self.current_url = Some(url.clone());
                Ok(())
            }
            None => Err(RenderError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn current_url(&self) -> Option<&Url> {
        self.current_url.as_ref()
    }

    async fn wait_until(&mut self, predicate: &ReadyPredicate<'_>, _timeout: Duration) -> bool {
        predicate(&self.document)
    }

    async fn close(&mut self) -> RenderResult<()> {
        self.log.borrow_mut().closes += 1;
        Ok(())
    }
}
