//! Run summary reporting
//!
//! Prints what a finished run produced: how it ended, how much it visited, and
//! how well each field was filled.

use crate::crawler::{CrawlOutcome, Termination};

/// Per-field fill counts, in field declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCoverage {
    pub name: String,
    pub filled: usize,
}

/// Counts how many records carry a non-empty value for each field
pub fn field_coverage(outcome: &CrawlOutcome) -> Vec<FieldCoverage> {
    let Some(first) = outcome.records.first() else {
        return Vec::new();
    };

    first
        .field_names()
        .map(|name| FieldCoverage {
            name: name.to_string(),
            filled: outcome
                .records
                .iter()
                .filter(|r| r.get(name).is_some_and(|v| !v.is_empty()))
                .count(),
        })
        .collect()
}

/// Whether the whole listing was covered, as shown in the summary
fn listing_coverage(termination: &Termination) -> &'static str {
    if termination.is_natural() {
        "complete"
    } else {
        "partial"
    }
}

/// Prints the outcome of a run to stdout in a formatted manner
///
/// # Arguments
///
/// * `outcome` - The finished run
pub fn print_summary(outcome: &CrawlOutcome) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Ended: {}", outcome.termination);
    println!("  Listing: {}", listing_coverage(&outcome.termination));
    println!("  Listing pages visited: {}", outcome.pages_visited);
    println!("  Detail pages attempted: {}", outcome.urls_visited);
    println!("  Records: {}", outcome.records.len());
    println!("  Failures: {}", outcome.failures.len());
    println!(
        "  Duration: {:.1}s",
        outcome.elapsed().num_milliseconds() as f64 / 1000.0
    );
    println!();

    let coverage = field_coverage(outcome);
    if !coverage.is_empty() {
        println!("Field Coverage:");
        let total = outcome.records.len();
        for field in &coverage {
            let percentage = (field.filled as f64 / total as f64) * 100.0;
            println!(
                "  {}: {} / {} ({:.1}%)",
                field.name, field.filled, total, percentage
            );
        }
        println!();
    }

    if !outcome.failures.is_empty() {
        println!("Failed Items ({}):", outcome.failures.len());
        for failure in &outcome.failures {
            println!("  - {}: {}", failure.url, failure.reason);
        }
        println!();
    }
}
