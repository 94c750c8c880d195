//! URL handling module for Dredge
//!
//! This module provides listing page URL construction and detail link resolution.

mod page;
mod resolve;

// Re-export main functions
pub use page::with_page_param;
pub use resolve::{resolve_href, strip_query};
