//! Field extraction
//!
//! This module turns a loaded detail page into field values:
//! - `ExtractionStrategy`: the declarative ways a value can be pulled from a page
//! - `FieldExtractor`: ordered, first-non-empty-wins resolution of one field
//! - `Record`: the fixed-schema result for one detail page

mod field;
mod record;
mod strategy;

pub use field::{extract_field, normalize_whitespace, FieldExtractor};
pub use record::Record;
pub use strategy::{ExtractionStrategy, StrategyConfig, DEFAULT_LABEL_WINDOW};
