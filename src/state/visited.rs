use std::collections::HashSet;
use url::Url;

/// Detail URLs already attempted in the current run
///
/// The set only grows. A URL is recorded before its page is fetched, so a page
/// that fails is not retried when it shows up again on a later listing page.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url`; returns false if it was already present
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    /// Returns true if `url` has been recorded
    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    /// Number of recorded URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
