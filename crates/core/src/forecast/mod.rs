//! Purchase-cadence forecasting.
//!
//! Turns validated purchase history into due-date predictions: the
//! estimator measures how often a product is bought, the scorer predicts
//! when it is next due and how much to trust that, and the ranker orders
//! the results for presentation.

mod estimator;
mod ranking;
mod scoring;

pub use estimator::IntervalEstimator;
pub use ranking::Ranker;
pub use scoring::ConfidenceScorer;

use chrono::NaiveDate;

use crate::config::CadenceConfig;
use crate::domain::history::{ProductHistory, PurchaseLedger};
use crate::domain::recommendation::ProductForecast;

/// Decay rate at which a one-year-old interval keeps ~10% of the weight
/// of a fresh one: `ln(10) / 365`.
pub const DEFAULT_DECAY_RATE: f64 = 0.00631;

/// Recency window width as a fraction of the mean interval.
pub const DEFAULT_RECENCY_WIDTH: f64 = 0.5;

/// Intervals needed before the sample factor stops discounting.
pub const DEFAULT_SATURATION_SAMPLES: u32 = 5;

/// Confidence floor for ranked output.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.05;

/// Cap on ranked results.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Minimum interval count for ranking eligibility.
pub const DEFAULT_MIN_SAMPLES: u32 = 1;

/// Floor for the recency window, in days.
pub const MIN_RECENCY_WIDTH_DAYS: f64 = 1.0;

/// Estimator and scorer behind one facade.
///
/// The full ranked run and the single-product detail path both go through
/// here, so a detail query returns exactly the numbers the ranked run
/// computed for the same product and date.
#[derive(Clone, Debug)]
pub struct Forecaster {
    estimator: IntervalEstimator,
    scorer: ConfidenceScorer,
}

impl Forecaster {
    pub fn new(estimator: IntervalEstimator, scorer: ConfidenceScorer) -> Self {
        Self { estimator, scorer }
    }

    pub fn from_config(config: &CadenceConfig) -> Self {
        Self::new(IntervalEstimator::from_config(config), ConfidenceScorer::from_config(config))
    }

    pub fn forecast_product(&self, history: &ProductHistory, today: NaiveDate) -> ProductForecast {
        let stats = self.estimator.estimate(history, today);
        let profile = self.estimator.usage_profile(history);
        let recommendation = self.scorer.score(&stats, today);
        ProductForecast { stats, profile, recommendation }
    }

    /// Forecast every product in the ledger, in ledger (product id) order.
    pub fn forecast_all(&self, ledger: &PurchaseLedger, today: NaiveDate) -> Vec<ProductForecast> {
        ledger.histories().map(|history| self.forecast_product(history, today)).collect()
    }

    pub fn explain(&self, forecast: &ProductForecast, today: NaiveDate) -> String {
        self.scorer.explain(
            &forecast.stats,
            &forecast.profile,
            forecast.recommendation.as_ref(),
            today,
        )
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::from_config(&CadenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    use crate::config::RankingConfig;
    use crate::domain::history::{ProductId, PurchaseEvent};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn weekly_events(start: NaiveDate, count: usize) -> Vec<PurchaseEvent> {
        (0..count)
            .map(|week| {
                PurchaseEvent::new(start + Duration::weeks(week as i64), Decimal::from(2))
                    .with_unit_price(Decimal::new(129, 2))
            })
            .collect()
    }

    fn fixture_ledger(today: NaiveDate) -> PurchaseLedger {
        // Weekly milk ending a week ago, biweekly bread, one-off cheese,
        // and a pair of butter purchases long abandoned.
        let milk_start = today - Duration::weeks(10);
        let bread_start = today - Duration::weeks(8);
        PurchaseLedger::from_events(
            today,
            vec![
                (ProductId::from("prod-milk"), weekly_events(milk_start, 10)),
                (
                    ProductId::from("prod-bread"),
                    (0..4)
                        .map(|i| {
                            PurchaseEvent::new(
                                bread_start + Duration::weeks(i * 2),
                                Decimal::ONE,
                            )
                        })
                        .collect(),
                ),
                (
                    ProductId::from("prod-cheese"),
                    vec![PurchaseEvent::new(today - Duration::days(20), Decimal::ONE)],
                ),
                (
                    ProductId::from("prod-butter"),
                    vec![
                        PurchaseEvent::new(today - Duration::days(330), Decimal::ONE),
                        PurchaseEvent::new(today - Duration::days(300), Decimal::ONE),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn weekly_item_is_due_today_with_high_confidence() {
        let today = date(2026, 6, 1);
        let forecasts = Forecaster::default().forecast_all(&fixture_ledger(today), today);
        let milk = forecasts
            .iter()
            .find(|f| f.product_id().as_str() == "prod-milk")
            .and_then(|f| f.recommendation.as_ref())
            .unwrap();

        assert_eq!(milk.days_until_due, 0);
        assert!(milk.confidence > 0.9);
    }

    #[test]
    fn abandoned_product_falls_below_the_default_threshold() {
        let today = date(2026, 6, 1);
        let forecaster = Forecaster::default();
        let forecasts = forecaster.forecast_all(&fixture_ledger(today), today);

        let butter = forecasts
            .iter()
            .find(|f| f.product_id().as_str() == "prod-butter")
            .and_then(|f| f.recommendation.as_ref())
            .unwrap();
        assert!(butter.confidence < DEFAULT_MIN_CONFIDENCE);

        let ranked = Ranker::from_config(&RankingConfig::default()).ranked(&forecasts);
        assert!(ranked.iter().all(|r| r.product_id.as_str() != "prod-butter"));
        assert!(ranked.iter().all(|r| r.product_id.as_str() != "prod-cheese"));
        assert_eq!(ranked.first().map(|r| r.product_id.as_str()), Some("prod-milk"));
    }

    #[test]
    fn detail_path_matches_the_ranked_run() {
        let today = date(2026, 6, 1);
        let ledger = fixture_ledger(today);
        let forecaster = Forecaster::default();

        let all = forecaster.forecast_all(&ledger, today);
        let milk_id = ProductId::from("prod-milk");
        let from_run =
            all.iter().find(|f| *f.product_id() == milk_id).unwrap();
        let from_detail =
            forecaster.forecast_product(ledger.get(&milk_id).unwrap(), today);

        assert_eq!(*from_run, from_detail);
    }

    #[test]
    fn forecasting_is_deterministic() {
        let today = date(2026, 6, 1);
        let ledger = fixture_ledger(today);
        let forecaster = Forecaster::default();

        assert_eq!(
            forecaster.forecast_all(&ledger, today),
            forecaster.forecast_all(&ledger, today)
        );
    }
}
