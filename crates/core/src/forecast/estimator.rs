//! Decay-weighted cadence estimation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::CadenceConfig;
use crate::domain::cadence::{CadenceStats, UsageProfile};
use crate::domain::history::ProductHistory;

/// Estimates how often a product is bought.
///
/// Each interval between consecutive purchases is weighted by
/// `exp(-decay_rate * age_days)`, age measured from the interval's end to
/// the reference date, so the estimate follows the household's current
/// rhythm instead of averaging over its whole past.
#[derive(Clone, Debug)]
pub struct IntervalEstimator {
    decay_rate: f64,
}

impl IntervalEstimator {
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }

    pub fn from_config(config: &CadenceConfig) -> Self {
        Self::new(config.decay_rate)
    }

    /// Weighted interval statistics as of `today`.
    ///
    /// Histories with fewer than two purchases yield `sample_count == 0`
    /// and zeroed interval fields; that is a valid answer, not an error.
    pub fn estimate(&self, history: &ProductHistory, today: NaiveDate) -> CadenceStats {
        let events = history.events();
        let last_purchase_on = history.last_purchase_on();

        if events.len() < 2 {
            return CadenceStats {
                product_id: history.product_id().clone(),
                sample_count: 0,
                mean_interval_days: 0.0,
                dispersion_days: 0.0,
                last_purchase_on,
            };
        }

        let mut samples = Vec::with_capacity(events.len() - 1);
        for pair in events.windows(2) {
            let interval = (pair[1].occurred_on - pair[0].occurred_on).num_days() as f64;
            let age = (today - pair[1].occurred_on).num_days().max(0) as f64;
            samples.push((interval, (-self.decay_rate * age).exp()));
        }

        let weight_sum: f64 = samples.iter().map(|(_, weight)| weight).sum();
        let mean = samples.iter().map(|(interval, weight)| interval * weight).sum::<f64>()
            / weight_sum;
        let variance = samples
            .iter()
            .map(|(interval, weight)| weight * (interval - mean).powi(2))
            .sum::<f64>()
            / weight_sum;

        CadenceStats {
            product_id: history.product_id().clone(),
            sample_count: samples.len(),
            mean_interval_days: mean,
            dispersion_days: variance.sqrt(),
            last_purchase_on,
        }
    }

    /// Quantity and price medians for the shopping list.
    pub fn usage_profile(&self, history: &ProductHistory) -> UsageProfile {
        let events = history.events();

        let mut quantities: Vec<Decimal> = events.iter().map(|event| event.quantity).collect();
        quantities.sort();
        let total_quantity: Decimal = quantities.iter().copied().sum();

        let mut prices: Vec<Decimal> =
            events.iter().filter_map(|event| event.unit_price).collect();
        prices.sort();

        UsageProfile {
            purchase_count: events.len(),
            total_quantity,
            median_quantity: median_of_sorted(&quantities).unwrap_or(Decimal::ZERO),
            median_unit_price: median_of_sorted(&prices),
        }
    }
}

fn median_of_sorted(sorted: &[Decimal]) -> Option<Decimal> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    }
}
