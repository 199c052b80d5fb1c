//! Popularity ranking for search results.
//!
//! Install counts run into the millions while ratings sit in `[0, 5]`, so
//! the rating term is scaled by a fixed constant before weighting.

use super::summary::ExtensionSummary;

pub const INSTALL_WEIGHT: f64 = 0.7;
pub const RATING_WEIGHT: f64 = 0.3;
pub const RATING_SCALE: f64 = 100_000.0;

/// Number of results a search returns
pub const MAX_RESULTS: usize = 5;

/// `install_count * 0.7 + average_rating * 0.3 * 100000`
pub fn score(summary: &ExtensionSummary) -> f64 {
    summary.install_count as f64 * INSTALL_WEIGHT
        + summary.average_rating * RATING_WEIGHT * RATING_SCALE
}

/// Sort by descending score and keep the top [`MAX_RESULTS`].
///
/// The sort is stable, so equal scores keep marketplace order.
pub fn top_ranked(mut summaries: Vec<ExtensionSummary>) -> Vec<ExtensionSummary> {
    summaries.sort_by(|a, b| score(b).total_cmp(&score(a)));
    summaries.truncate(MAX_RESULTS);
    summaries
}
