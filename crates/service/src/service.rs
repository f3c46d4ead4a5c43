use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use pantry_catalog::{CacheError, ProductCache, ProductMetadata};
use pantry_core::{
    AppConfig, Clock, Forecaster, ProductId, PurchaseLedger, Ranker, Recommendation,
    ShoppingConfig, SystemClock, UrgencyLevel, UsageProfile,
};

use crate::report::{
    ProductDetail, RankedProduct, RecommendationReport, ShoppingItem, ShoppingList,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("product `{0}` has no purchase history")]
    UnknownProduct(ProductId),
    #[error("catalog cache failure: {0}")]
    Catalog(#[from] CacheError),
}

/// Ties the pure forecasting core to the metadata cache. Each call takes
/// exactly one clock reading; every date inside one report derives from it.
pub struct RecommendationService {
    forecaster: Forecaster,
    ranker: Ranker,
    shopping: ShoppingConfig,
    cache: Arc<ProductCache>,
    clock: Arc<dyn Clock>,
}

impl RecommendationService {
    pub fn new(config: &AppConfig, cache: Arc<ProductCache>) -> Self {
        Self::with_clock(config, cache, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &AppConfig,
        cache: Arc<ProductCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            forecaster: Forecaster::from_config(&config.cadence),
            ranker: Ranker::from_config(&config.ranking),
            shopping: config.shopping.clone(),
            cache,
            clock,
        }
    }

    pub async fn ranked(
        &self,
        ledger: &PurchaseLedger,
    ) -> Result<RecommendationReport, ServiceError> {
        let generated_at = self.clock.now();
        let today = generated_at.date_naive();

        let forecasts = self.forecaster.forecast_all(ledger, today);
        let analyzed = forecasts.len();
        let picks = self.ranker.ranked(&forecasts);
        debug!(analyzed, ranked = picks.len(), %today, "ranked purchase recommendations");

        let mut metadata = self.metadata_for(&picks).await?;
        let recommendations: Vec<RankedProduct> = picks
            .into_iter()
            .map(|recommendation| {
                let metadata = metadata.remove(&recommendation.product_id);
                if metadata.is_none() {
                    warn!(
                        product_id = %recommendation.product_id,
                        "metadata unavailable, serving recommendation without enrichment",
                    );
                }
                RankedProduct { recommendation, metadata }
            })
            .collect();

        Ok(RecommendationReport {
            generated_at,
            analyzed,
            ranked: recommendations.len(),
            recommendations,
        })
    }

    pub async fn product_detail(
        &self,
        ledger: &PurchaseLedger,
        product_id: &ProductId,
    ) -> Result<ProductDetail, ServiceError> {
        let today = self.clock.today();
        let history = ledger
            .get(product_id)
            .ok_or_else(|| ServiceError::UnknownProduct(product_id.clone()))?;

        let forecast = self.forecaster.forecast_product(history, today);
        let explanation = self.forecaster.explain(&forecast, today);

        let metadata = match self.cache.get(product_id).await {
            Ok(metadata) => Some(metadata),
            Err(CacheError::Fetch(error)) => {
                warn!(product_id = %product_id, error = %error, "metadata unavailable for detail view");
                None
            }
            Err(corrupted) => return Err(ServiceError::Catalog(corrupted)),
        };

        Ok(ProductDetail {
            product_id: product_id.clone(),
            insufficient_history: !forecast.has_recommendation(),
            stats: forecast.stats,
            profile: forecast.profile,
            recommendation: forecast.recommendation,
            explanation,
            metadata,
        })
    }

    /// Turns the ranked picks into a shopping list for the next
    /// `planning_horizon_days`: due within the horizon means `Needed`,
    /// within twice the horizon `Soon`, anything later is left off.
    pub async fn shopping_list(&self, ledger: &PurchaseLedger) -> Result<ShoppingList, ServiceError> {
        let generated_at = self.clock.now();
        let today = generated_at.date_naive();
        let horizon = self.shopping.planning_horizon_days;

        let forecasts = self.forecaster.forecast_all(ledger, today);
        let profiles: HashMap<&ProductId, &UsageProfile> = forecasts
            .iter()
            .map(|forecast| (forecast.product_id(), &forecast.profile))
            .collect();

        let picks: Vec<Recommendation> = self
            .ranker
            .ranked(&forecasts)
            .into_iter()
            .filter(|pick| pick.days_until_due <= horizon * 2)
            .collect();
        debug!(items = picks.len(), horizon, %today, "assembled shopping list");

        let mut metadata = self.metadata_for(&picks).await?;
        let items: Vec<ShoppingItem> = picks
            .into_iter()
            .map(|pick| {
                let urgency = UrgencyLevel::from_days_until_due(pick.days_until_due, horizon);
                let profile = profiles.get(&pick.product_id);
                let suggested_quantity =
                    profile.map_or(1, |profile| suggested_quantity(profile));
                let estimated_cost = profile
                    .and_then(|profile| profile.median_unit_price)
                    .map(|price| price * Decimal::from(suggested_quantity));

                ShoppingItem {
                    metadata: metadata.remove(&pick.product_id),
                    product_id: pick.product_id,
                    urgency,
                    days_until_due: pick.days_until_due,
                    confidence: pick.confidence,
                    suggested_quantity,
                    estimated_cost,
                }
            })
            .collect();

        let mut list = ShoppingList {
            generated_at,
            planning_horizon_days: horizon,
            items,
            estimated_total: None,
        };
        let needed_costs: Vec<Decimal> =
            list.needed().filter_map(|item| item.estimated_cost).collect();
        list.estimated_total =
            (!needed_costs.is_empty()).then(|| needed_costs.iter().copied().sum());
        Ok(list)
    }

    async fn metadata_for(
        &self,
        picks: &[Recommendation],
    ) -> Result<HashMap<ProductId, ProductMetadata>, ServiceError> {
        if picks.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<ProductId> = picks.iter().map(|pick| pick.product_id.clone()).collect();
        // Per-id fetch failures are already absorbed by the cache; the only
        // error that can surface here is corruption, which must propagate.
        Ok(self.cache.get_batch(&ids).await?)
    }
}

fn suggested_quantity(profile: &UsageProfile) -> u32 {
    profile.median_quantity.ceil().to_u32().unwrap_or(1).max(1)
}
