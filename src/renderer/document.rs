//! Parsed HTML document implementing [`PageView`]
//!
//! Visible text is an approximation of what a browser would render as inner
//! text: scripts, styles and hidden elements are skipped, source whitespace is
//! collapsed, and block-level elements start new lines.

use crate::renderer::traits::{Element, PageView};
use scraper::{ElementRef, Html, Selector};
use std::cell::OnceCell;

/// Elements whose content is never rendered
const HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "title", "iframe", "object",
];

/// Elements rendered on their own line
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "caption", "dd", "details", "dialog", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// A parsed page
pub struct Document {
    html: Html,
    visible_text: OnceCell<String>,
}

impl Document {
    /// Parses a complete HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            visible_text: OnceCell::new(),
        }
    }

    /// A document with no content
    pub fn empty() -> Self {
        Self::parse("")
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

impl PageView for Document {
    fn find_all(&self, selector: &str) -> Vec<Element> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Ignoring unparsable selector '{}': {}", selector, e);
                return Vec::new();
            }
        };

        self.html.select(&parsed).map(snapshot).collect()
    }

    fn full_visible_text(&self) -> String {
        self.visible_text
            .get_or_init(|| {
                Selector::parse("body")
                    .ok()
                    .and_then(|body| self.html.select(&body).next().map(visible_text))
                    .unwrap_or_default()
            })
            .clone()
    }
}

/// Takes an owned snapshot of an element
fn snapshot(element: ElementRef<'_>) -> Element {
    let attributes = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    Element::new(visible_text(element), attributes)
}

/// Rendered text of an element's subtree, one line per block
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_visible(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            // Source line breaks are layout-insignificant.
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            continue;
        }

        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };

        let value = child_element.value();
        let name = value.name();
        if HIDDEN_TAGS.contains(&name) || value.attr("hidden").is_some() {
            continue;
        }

        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = BLOCK_TAGS.contains(&name);
        if block {
            out.push('\n');
        }
        push_visible(child_element, out);
        if block {
            out.push('\n');
        }
    }
}
