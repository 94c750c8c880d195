use crate::extract::ExtractionStrategy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for a Dredge run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Hard cap on the number of records produced
    #[serde(default)]
    pub item_limit: Option<u32>,

    pub listing: ListingConfig,

    #[serde(default)]
    pub detail: DetailConfig,

    #[serde(default)]
    pub politeness: PolitenessConfig,

    #[serde(default)]
    pub renderer: RendererConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Fields extracted from every detail page, in declaration order
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldSpec>,
}

impl Config {
    /// Names of the configured fields, in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Column order for the output sink
    ///
    /// Falls back to the field declaration order when no columns are configured.
    pub fn output_columns(&self) -> Vec<String> {
        if self.output.columns.is_empty() {
            self.field_names()
        } else {
            self.output.columns.clone()
        }
    }
}

/// Listing traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ListingConfig {
    /// Entry URL of the listing (page at the start index)
    pub start_url: String,

    /// Query parameter carrying the page index
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// First page index
    #[serde(default)]
    pub page_start: u32,

    /// Exclusive upper bound on the page index (safety cap)
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Any of these selectors being present means the listing has rendered
    #[serde(default)]
    pub ready_selectors: Vec<String>,

    /// Selectors matching anchors that lead to detail pages
    pub link_selectors: Vec<String>,

    /// Only keep links whose absolute URL contains this substring
    #[serde(default)]
    pub link_must_contain: Option<String>,

    /// Drop query strings from detail links before deduplication
    #[serde(default)]
    pub strip_link_query: bool,

    /// Readiness wait budget for a listing page (seconds)
    #[serde(default = "default_listing_ready_timeout")]
    pub ready_timeout_secs: u64,

    /// Pause after a listing page reports ready (milliseconds)
    #[serde(default = "default_listing_settle")]
    pub settle_ms: u64,
}

impl ListingConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Detail page configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DetailConfig {
    /// Wait budget for the document body to appear (seconds)
    #[serde(default = "default_detail_ready_timeout")]
    pub ready_timeout_secs: u64,

    /// Settling delay before extraction starts (milliseconds)
    #[serde(default = "default_detail_settle")]
    pub settle_ms: u64,
}

impl DetailConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            ready_timeout_secs: default_detail_ready_timeout(),
            settle_ms: default_detail_settle(),
        }
    }
}

/// Delays observed between requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PolitenessConfig {
    /// Delay between successive listing page fetches (milliseconds)
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,

    /// Delay between successive detail page fetches (milliseconds)
    #[serde(default = "default_item_delay")]
    pub item_delay_ms: u64,
}

impl PolitenessConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay(),
            item_delay_ms: default_item_delay(),
        }
    }
}

/// HTTP renderer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RendererConfig {
    /// User agent sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Whole-navigation timeout (seconds)
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            page_load_timeout_secs: default_page_load_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the tabular output file
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Column order; empty means field declaration order
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            columns: Vec::new(),
        }
    }
}

/// One output field and the strategies that resolve it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FieldSpec {
    /// Column name of the field
    pub name: String,

    /// Strategies in priority order; the first non-empty result wins
    pub strategies: Vec<ExtractionStrategy>,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_max_pages() -> u32 {
    200
}

fn default_listing_ready_timeout() -> u64 {
    20
}

fn default_listing_settle() -> u64 {
    500
}

fn default_detail_ready_timeout() -> u64 {
    30
}

fn default_detail_settle() -> u64 {
    600
}

fn default_page_delay() -> u64 {
    700
}

fn default_item_delay() -> u64 {
    400
}

fn default_page_load_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_output_path() -> PathBuf {
    PathBuf::from("results.csv")
}
