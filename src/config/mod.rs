//! Configuration module for Dredge
//!
//! This module handles loading, parsing, and validating TOML run configurations.
//!
//! # Example
//!
//! ```no_run
//! use dredge::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("demos/template.toml")).unwrap();
//! println!("Crawling at most {} listing pages", config.listing.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DetailConfig, FieldSpec, ListingConfig, OutputConfig, PolitenessConfig,
    RendererConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
