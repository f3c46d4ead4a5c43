//! Cadence statistics and usage profiles derived from purchase history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::history::ProductId;

/// Decay-weighted interval statistics for one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CadenceStats {
    pub product_id: ProductId,
    /// Number of inter-purchase intervals, `events - 1`.
    pub sample_count: usize,
    /// Weighted mean days between purchases; 0.0 without a cadence.
    pub mean_interval_days: f64,
    /// Weighted standard deviation of the intervals; 0.0 for a single one.
    pub dispersion_days: f64,
    pub last_purchase_on: NaiveDate,
}

impl CadenceStats {
    /// Whether enough history exists to predict anything: two purchases,
    /// i.e. at least one interval.
    pub fn has_cadence(&self) -> bool {
        self.sample_count >= 1
    }
}

/// Quantity and price profile for one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    /// Distinct purchase days after same-day merging.
    pub purchase_count: usize,
    pub total_quantity: Decimal,
    pub median_quantity: Decimal,
    /// Median over priced events; `None` when no event carries a price.
    pub median_unit_price: Option<Decimal>,
}
