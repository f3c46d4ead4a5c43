//! Upstream catalog access behind an async trait.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use pantry_core::ProductId;

use crate::metadata::ProductMetadata;

/// `Clone` so a single upstream failure can be handed to every caller
/// waiting on the same in-flight fetch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product is not in the catalog")]
    NotFound,
    #[error("catalog fetch exceeded {limit:?}")]
    Timeout { limit: Duration },
    #[error("catalog upstream error: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, product_id: &ProductId) -> Result<ProductMetadata, CatalogError>;

    /// Batch lookup. Backends without a batch endpoint fall back to the
    /// per-product call; ids that fail individually are left out of the
    /// result map rather than failing the whole batch.
    async fn fetch_batch(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductMetadata>, CatalogError> {
        let mut found = HashMap::with_capacity(product_ids.len());
        for product_id in product_ids {
            if let Ok(metadata) = self.fetch(product_id).await {
                found.insert(product_id.clone(), metadata);
            }
        }
        Ok(found)
    }
}

/// Fixed in-memory catalog. Backs the CLI's `--catalog` file and the
/// test suites; real deployments put an HTTP client behind the same trait.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    products: HashMap<ProductId, ProductMetadata>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product_id: ProductId, metadata: ProductMetadata) {
        self.products.insert(product_id, metadata);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<(ProductId, ProductMetadata)> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = (ProductId, ProductMetadata)>>(iter: I) -> Self {
        Self { products: iter.into_iter().collect() }
    }
}

#[async_trait]
impl CatalogFetcher for StaticCatalog {
    async fn fetch(&self, product_id: &ProductId) -> Result<ProductMetadata, CatalogError> {
        self.products.get(product_id).cloned().ok_or(CatalogError::NotFound)
    }
}
