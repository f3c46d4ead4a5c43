//! Deterministic ordering of product forecasts.

use crate::config::RankingConfig;
use crate::domain::recommendation::{ProductForecast, Recommendation};

/// Filters and orders forecasts for presentation.
///
/// The sort key is urgency descending, then days-until-due ascending, then
/// product id, so equal-urgency ties always resolve the same way and
/// repeated runs over the same input produce identical output.
#[derive(Clone, Debug)]
pub struct Ranker {
    min_confidence: f64,
    max_results: usize,
    min_samples: u32,
}

impl Ranker {
    pub fn new(min_confidence: f64, max_results: usize, min_samples: u32) -> Self {
        Self { min_confidence, max_results, min_samples }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.min_confidence, config.max_results, config.min_samples)
    }

    /// Recommendations worth showing, most urgent first.
    pub fn ranked(&self, forecasts: &[ProductForecast]) -> Vec<Recommendation> {
        let mut picks: Vec<Recommendation> = forecasts
            .iter()
            .filter(|forecast| forecast.stats.sample_count >= self.min_samples as usize)
            .filter_map(|forecast| forecast.recommendation.clone())
            .filter(|recommendation| recommendation.confidence >= self.min_confidence)
            .collect();

        picks.sort_by(|a, b| {
            b.urgency
                .total_cmp(&a.urgency)
                .then_with(|| a.days_until_due.cmp(&b.days_until_due))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        picks.truncate(self.max_results);
        picks
    }
}
