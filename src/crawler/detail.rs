//! Detail page scraping
//!
//! Loads one detail page, waits for a minimal readiness signal, lets the page
//! settle, then resolves every configured field into a record.

use crate::config::{DetailConfig, FieldSpec};
use crate::extract::{FieldExtractor, Record};
use crate::renderer::{body_present, RenderResult, Renderer};
use std::time::Duration;
use url::Url;

/// Produces one record per detail page
#[derive(Debug, Clone)]
pub struct DetailScraper<'a> {
    fields: &'a [FieldSpec],
    ready_timeout: Duration,
    settle: Duration,
}

impl<'a> DetailScraper<'a> {
    /// Creates a scraper for the given field set
    pub fn new(fields: &'a [FieldSpec], config: &DetailConfig) -> Self {
        Self {
            fields,
            ready_timeout: config.ready_timeout(),
            settle: config.settle(),
        }
    }

    /// Scrapes the detail page at `url`
    ///
    /// Missing fields never fail the scrape; they come back empty. Only a failed
    /// navigation is an error.
    pub async fn scrape<R: Renderer>(&self, renderer: &mut R, url: &Url) -> RenderResult<Record> {
        renderer.navigate(url).await?;

        if !renderer.wait_until(&body_present, self.ready_timeout).await {
            tracing::warn!("Detail page body not detected for {} (continuing)", url);
        }

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let extractor = FieldExtractor::new(&*renderer);
        let mut record = Record::new(self.fields.iter().map(|f| f.name.as_str()));
        for field in self.fields {
            let value = extractor.extract(&field.strategies);
            if value.is_empty() {
                tracing::debug!("Field '{}' not found on {}", field.name, url);
            }
            record.set(&field.name, value);
        }

        tracing::debug!(
            "Extracted {}/{} fields from {}",
            record.filled(),
            record.len(),
            url
        );
        Ok(record)
    }
}
