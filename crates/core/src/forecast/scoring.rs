//! Due-date prediction and confidence scoring.

use chrono::{Duration, NaiveDate};

use super::MIN_RECENCY_WIDTH_DAYS;
use crate::config::CadenceConfig;
use crate::domain::cadence::{CadenceStats, UsageProfile};
use crate::domain::recommendation::Recommendation;

/// Scores how much to trust a cadence and how soon it matters.
///
/// Confidence is the product of three `[0, 1]` factors:
/// regularity (how even the intervals are), recency closeness (how near
/// `today` is to the predicted date), and a sample factor that ramps up
/// over the first few intervals.
#[derive(Clone, Debug)]
pub struct ConfidenceScorer {
    recency_width: f64,
    saturation_samples: u32,
}

impl ConfidenceScorer {
    pub fn new(recency_width: f64, saturation_samples: u32) -> Self {
        Self { recency_width, saturation_samples }
    }

    pub fn from_config(config: &CadenceConfig) -> Self {
        Self::new(config.recency_width, config.saturation_samples)
    }

    /// Predict the next due date and score it. `None` without a cadence.
    pub fn score(&self, stats: &CadenceStats, today: NaiveDate) -> Option<Recommendation> {
        if !stats.has_cadence() {
            return None;
        }

        let cycle_days = stats.mean_interval_days.round() as i64;
        let predicted_due_on = stats.last_purchase_on + Duration::days(cycle_days);
        let days_until_due = (predicted_due_on - today).num_days();

        let confidence = (self.regularity(stats)
            * self.recency_closeness(stats, days_until_due)
            * self.sample_factor(stats.sample_count))
        .clamp(0.0, 1.0);

        let urgency = if days_until_due < 0 {
            confidence * (-days_until_due) as f64
        } else {
            confidence / (1.0 + days_until_due as f64)
        };

        Some(Recommendation {
            product_id: stats.product_id.clone(),
            predicted_due_on,
            days_until_due,
            confidence,
            urgency,
        })
    }

    /// How even the intervals are: 1.0 for clockwork, 0.0 once the spread
    /// reaches the mean itself.
    fn regularity(&self, stats: &CadenceStats) -> f64 {
        (1.0 - stats.dispersion_days / stats.mean_interval_days).clamp(0.0, 1.0)
    }

    /// Bell curve over days-until-due, peaking at the predicted date.
    ///
    /// The width scales with the cadence (half the mean interval by
    /// default) and widens further for irregular products, so a weekly
    /// item fades within days while a quarterly one stays relevant for
    /// weeks. Far from the due date in either direction this approaches
    /// zero.
    fn recency_closeness(&self, stats: &CadenceStats, days_until_due: i64) -> f64 {
        let width = (self.recency_width * stats.mean_interval_days)
            .max(stats.dispersion_days)
            .max(MIN_RECENCY_WIDTH_DAYS);
        let z = days_until_due as f64 / width;
        (-0.5 * z * z).exp()
    }

    /// Ramps from 1/saturation for a single interval up to 1.0.
    fn sample_factor(&self, sample_count: usize) -> f64 {
        (sample_count as f64 / f64::from(self.saturation_samples)).min(1.0)
    }

    /// Human-readable account of a prediction for the detail view.
    pub fn explain(
        &self,
        stats: &CadenceStats,
        profile: &UsageProfile,
        recommendation: Option<&Recommendation>,
        today: NaiveDate,
    ) -> String {
        let Some(recommendation) = recommendation else {
            return format!(
                "Only {} purchase recorded; at least two are needed to estimate a cadence.",
                profile.purchase_count
            );
        };

        let days_since_last = (today - stats.last_purchase_on).num_days();
        let due_phrase = match recommendation.days_until_due {
            days if days < 0 => format!("{} days overdue", -days),
            0 => "due today".to_string(),
            1 => "due tomorrow".to_string(),
            days => format!("due in {days} days"),
        };

        format!(
            "Bought {} times, typically every {:.1} days (\u{00b1}{:.1}). Last purchase {} \
             ({} days ago); next predicted {} ({}). Confidence {:.0}%: regularity {:.0}%, \
             timing {:.0}%, history depth {:.0}%.",
            profile.purchase_count,
            stats.mean_interval_days,
            stats.dispersion_days,
            stats.last_purchase_on,
            days_since_last,
            recommendation.predicted_due_on,
            due_phrase,
            recommendation.confidence * 100.0,
            self.regularity(stats) * 100.0,
            self.recency_closeness(stats, recommendation.days_until_due) * 100.0,
            self.sample_factor(stats.sample_count) * 100.0,
        )
    }
}
