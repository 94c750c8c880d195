//! Extraction strategy definitions
//!
//! A strategy is one technique for pulling a field value out of a rendered page.
//! Strategies are declared in configuration as small inline tables and are
//! distinguished by their keys:
//!
//! | TOML form | Strategy |
//! |-----------|----------|
//! | `{ css = "h1" }` | [`ExtractionStrategy::ElementText`] |
//! | `{ css = "a.dl", attr = "href" }` | [`ExtractionStrategy::ElementAttribute`] |
//! | `{ regex = "..." }` | [`ExtractionStrategy::RegexOverPageText`] |
//! | `{ near-label = [..], regex = "..." }` | [`ExtractionStrategy::RegexNearLabel`] |
//! | `{ css = "p", matching = "..." }` | [`ExtractionStrategy::ElementMatching`] |

use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Default search window after a label, in bytes
pub const DEFAULT_LABEL_WINDOW: usize = 400;

/// How to pull one field's value from a page
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "StrategyConfig")]
pub enum ExtractionStrategy {
    /// Text content of the first element matching `selector`
    ElementText { selector: String },

    /// Named attribute of the first element matching `selector`
    ElementAttribute { selector: String, attribute: String },

    /// First match of `pattern` against the page's full visible text
    ///
    /// `group` selects a capture group; 0 is the whole match.
    RegexOverPageText { pattern: Regex, group: usize },

    /// First match of `pattern` within `window` bytes after any of `labels`
    ///
    /// Labels are tried in order and located case-insensitively.
    RegexNearLabel {
        labels: Vec<String>,
        pattern: Regex,
        window: usize,
        group: usize,
    },

    /// Text of the first element matching `selector` whose text matches `pattern`
    ElementMatching {
        selector: String,
        pattern: Regex,
        max_len: Option<usize>,
    },
}

impl ExtractionStrategy {
    /// Builds an `ElementText` strategy
    pub fn text(selector: impl Into<String>) -> Self {
        Self::ElementText {
            selector: selector.into(),
        }
    }

    /// Builds an `ElementAttribute` strategy
    pub fn attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::ElementAttribute {
            selector: selector.into(),
            attribute: attribute.into(),
        }
    }

    /// Builds a whole-match `RegexOverPageText` strategy
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::RegexOverPageText {
            pattern: Regex::new(pattern)?,
            group: 0,
        })
    }

    /// Short tag used in trace output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ElementText { .. } => "element-text",
            Self::ElementAttribute { .. } => "element-attribute",
            Self::RegexOverPageText { .. } => "regex",
            Self::RegexNearLabel { .. } => "regex-near-label",
            Self::ElementMatching { .. } => "element-matching",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementText { selector } => write!(f, "text({})", selector),
            Self::ElementAttribute {
                selector,
                attribute,
            } => write!(f, "attr({}, {})", selector, attribute),
            Self::RegexOverPageText { pattern, .. } => write!(f, "regex(/{}/)", pattern),
            Self::RegexNearLabel { labels, pattern, .. } => {
                write!(f, "near({:?}, /{}/)", labels, pattern)
            }
            Self::ElementMatching {
                selector, pattern, ..
            } => write!(f, "matching({}, /{}/)", selector, pattern),
        }
    }
}

/// Raw strategy table as written in configuration
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StrategyConfig {
    Attribute(AttributeDef),
    Matching(MatchingDef),
    Text(TextDef),
    NearLabel(NearLabelDef),
    Regex(RegexDef),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextDef {
    css: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDef {
    css: String,
    attr: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MatchingDef {
    css: String,
    matching: String,
    #[serde(default)]
    max_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexDef {
    regex: String,
    #[serde(default)]
    group: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NearLabelDef {
    near_label: Vec<String>,
    regex: String,
    #[serde(default)]
    window: Option<usize>,
    #[serde(default)]
    group: usize,
}

fn compile(pattern: &str) -> Result<Regex, String> {
    Regex::new(pattern).map_err(|e| format!("invalid regex '{}': {}", pattern, e))
}

impl TryFrom<StrategyConfig> for ExtractionStrategy {
    type Error = String;

    fn try_from(raw: StrategyConfig) -> Result<Self, Self::Error> {
        Ok(match raw {
            StrategyConfig::Text(def) => Self::ElementText { selector: def.css },
            StrategyConfig::Attribute(def) => Self::ElementAttribute {
                selector: def.css,
                attribute: def.attr,
            },
            StrategyConfig::Matching(def) => Self::ElementMatching {
                selector: def.css,
                pattern: compile(&def.matching)?,
                max_len: def.max_len,
            },
            StrategyConfig::Regex(def) => {
                let pattern = compile(&def.regex)?;
                check_group(&pattern, def.group)?;
                Self::RegexOverPageText {
                    pattern,
                    group: def.group,
                }
            }
            StrategyConfig::NearLabel(def) => {
                if def.near_label.is_empty() {
                    return Err("near-label needs at least one label".to_string());
                }
                let pattern = compile(&def.regex)?;
                check_group(&pattern, def.group)?;
                Self::RegexNearLabel {
                    labels: def.near_label,
                    pattern,
                    window: def.window.unwrap_or(DEFAULT_LABEL_WINDOW),
                    group: def.group,
                }
            }
        })
    }
}

fn check_group(pattern: &Regex, group: usize) -> Result<(), String> {
    if group >= pattern.captures_len() {
        return Err(format!(
            "regex '{}' has no capture group {}",
            pattern, group
        ));
    }
    Ok(())
}
