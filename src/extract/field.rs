//! Field resolution over an ordered list of strategies
//!
//! Strategies are tried in declaration order and the first one that yields a
//! non-empty, whitespace-normalized value wins. A strategy that does not apply
//! (nothing matches, attribute missing, no regex hit) is not an error: resolution
//! just moves on, and a field nobody could resolve comes back as an empty string.

use crate::extract::strategy::ExtractionStrategy;
use crate::renderer::PageView;
use regex::Regex;
use std::cell::OnceCell;

/// Resolves field values against one loaded page
///
/// The page's full visible text is computed at most once, on the first strategy
/// that needs it, and shared by every field resolved through the same extractor.
pub struct FieldExtractor<'a, P: PageView + ?Sized> {
    page: &'a P,
    page_text: OnceCell<String>,
}

impl<'a, P: PageView + ?Sized> FieldExtractor<'a, P> {
    /// Creates an extractor over the given page
    pub fn new(page: &'a P) -> Self {
        Self {
            page,
            page_text: OnceCell::new(),
        }
    }

    /// Resolves one field value; never fails
    pub fn extract(&self, strategies: &[ExtractionStrategy]) -> String {
        for (index, strategy) in strategies.iter().enumerate() {
            if let Some(value) = self.apply(strategy) {
                tracing::trace!("strategy #{} {} resolved '{}'", index, strategy, value);
                return value;
            }
            tracing::trace!("strategy #{} {} inapplicable", index, strategy);
        }
        String::new()
    }

    fn page_text(&self) -> &str {
        self.page_text.get_or_init(|| self.page.full_visible_text())
    }

    /// Applies one strategy; Some only for a non-empty normalized value
    fn apply(&self, strategy: &ExtractionStrategy) -> Option<String> {
        match strategy {
            ExtractionStrategy::ElementText { selector } => {
                let element = self.page.find_first(selector)?;
                non_empty(normalize_whitespace(element.text()))
            }

            ExtractionStrategy::ElementAttribute {
                selector,
                attribute,
            } => {
                let element = self.page.find_first(selector)?;
                let value = element.attribute(attribute).unwrap_or("");
                non_empty(normalize_whitespace(value))
            }

            ExtractionStrategy::RegexOverPageText { pattern, group } => {
                let found = capture(pattern, self.page_text(), *group)?;
                non_empty(normalize_whitespace(found))
            }

            ExtractionStrategy::RegexNearLabel {
                labels,
                pattern,
                window,
                group,
            } => {
                let text = self.page_text();
                labels.iter().find_map(|label| {
                    let region = window_after(text, label, *window)?;
                    let found = capture(pattern, region, *group)?;
                    non_empty(normalize_whitespace(found))
                })
            }

            ExtractionStrategy::ElementMatching {
                selector,
                pattern,
                max_len,
            } => self.page.find_all(selector).iter().find_map(|element| {
                let text = element.text().trim();
                if text.is_empty() || max_len.is_some_and(|max| text.chars().count() >= max) {
                    return None;
                }
                if !pattern.is_match(text) {
                    return None;
                }
                non_empty(normalize_whitespace(text))
            }),
        }
    }
}

/// Resolves one field value against a page
///
/// Convenience wrapper for a single field; use [`FieldExtractor`] when resolving
/// several fields on the same page.
pub fn extract_field<P: PageView + ?Sized>(page: &P, strategies: &[ExtractionStrategy]) -> String {
    FieldExtractor::new(page).extract(strategies)
}

/// Collapses whitespace runs to a single space and trims both ends
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Text of capture group `group` for the first match of `pattern`
fn capture<'t>(pattern: &Regex, haystack: &'t str, group: usize) -> Option<&'t str> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

/// The slice of `text` starting at the first case-insensitive occurrence of
/// `label` and spanning at most `window` bytes
fn window_after<'t>(text: &'t str, label: &str, window: usize) -> Option<&'t str> {
    // ASCII lowercasing keeps byte offsets aligned with the original text.
    let start = text
        .to_ascii_lowercase()
        .find(&label.to_ascii_lowercase())?;

    let mut end = start.saturating_add(window).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Some(&text[start..end])
}
