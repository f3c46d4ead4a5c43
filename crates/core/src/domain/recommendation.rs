//! Recommendation outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cadence::{CadenceStats, UsageProfile};
use super::history::ProductId;

/// A due-date prediction for one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    pub predicted_due_on: NaiveDate,
    /// Days from the reference date to the predicted date; negative when
    /// overdue.
    pub days_until_due: i64,
    /// Combined score in `[0, 1]`.
    pub confidence: f64,
    /// Ranking key: grows linearly past the due date, shrinks
    /// hyperbolically before it.
    pub urgency: f64,
}

/// Shopping-list tier relative to the planning horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    /// Due within the planning horizon, or already overdue.
    Needed,
    /// Due within twice the planning horizon.
    Soon,
    /// Everything further out.
    Later,
}

impl UrgencyLevel {
    pub fn from_days_until_due(days_until_due: i64, horizon_days: i64) -> Self {
        if days_until_due <= horizon_days {
            Self::Needed
        } else if days_until_due <= horizon_days * 2 {
            Self::Soon
        } else {
            Self::Later
        }
    }
}

/// Combined estimator and scorer output for one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductForecast {
    pub stats: CadenceStats,
    pub profile: UsageProfile,
    /// `None` exactly when the history has no interval to learn from.
    pub recommendation: Option<Recommendation>,
}

impl ProductForecast {
    pub fn product_id(&self) -> &ProductId {
        &self.stats.product_id
    }

    pub fn has_recommendation(&self) -> bool {
        self.recommendation.is_some()
    }
}
