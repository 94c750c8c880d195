//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PagerState`: where listing traversal stands (at a page, exhausted, capped)
//! - `VisitedSet`: detail URLs already attempted in the current run

mod pager_state;
mod visited;

// Re-export main types
pub use pager_state::PagerState;
pub use visited::VisitedSet;
