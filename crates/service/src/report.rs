use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pantry_catalog::ProductMetadata;
use pantry_core::{CadenceStats, ProductId, Recommendation, UrgencyLevel, UsageProfile};

/// The ranked answer to "what should I buy?". `analyzed` counts every
/// product that was forecast, `ranked` only those that survived the
/// confidence and sample filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub generated_at: DateTime<Utc>,
    pub analyzed: usize,
    pub ranked: usize,
    pub recommendations: Vec<RankedProduct>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub recommendation: Recommendation,
    pub metadata: Option<ProductMetadata>,
}

impl RankedProduct {
    pub fn product_id(&self) -> &ProductId {
        &self.recommendation.product_id
    }
}

/// Everything known about a single product: the raw cadence numbers, the
/// usage profile, the optional recommendation, and a prose explanation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product_id: ProductId,
    pub stats: CadenceStats,
    pub profile: UsageProfile,
    pub recommendation: Option<Recommendation>,
    pub insufficient_history: bool,
    pub explanation: String,
    pub metadata: Option<ProductMetadata>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub generated_at: DateTime<Utc>,
    pub planning_horizon_days: i64,
    pub items: Vec<ShoppingItem>,
    /// Sum of the priced `Needed` items; `None` when no needed item
    /// carries a price.
    pub estimated_total: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub product_id: ProductId,
    pub urgency: UrgencyLevel,
    pub days_until_due: i64,
    pub confidence: f64,
    pub suggested_quantity: u32,
    pub estimated_cost: Option<Decimal>,
    pub metadata: Option<ProductMetadata>,
}

impl ShoppingList {
    pub fn needed(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.items.iter().filter(|item| item.urgency == UrgencyLevel::Needed)
    }
}
