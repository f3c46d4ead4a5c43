pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forecast;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use config::{
    AppConfig, CadenceConfig, CatalogSettings, ConfigError, ConfigOverrides, LoadOptions,
    LogFormat, LoggingConfig, RankingConfig, ShoppingConfig,
};
pub use domain::cadence::{CadenceStats, UsageProfile};
pub use domain::history::{ProductHistory, ProductId, PurchaseEvent, PurchaseLedger};
pub use domain::recommendation::{ProductForecast, Recommendation, UrgencyLevel};
pub use errors::HistoryError;
pub use forecast::{ConfidenceScorer, Forecaster, IntervalEstimator, Ranker};
