pub mod cache;
pub mod fetcher;
pub mod metadata;

pub use cache::{CacheConfig, CacheEntry, CacheError, CacheStats, ProductCache};
pub use fetcher::{CatalogError, CatalogFetcher, StaticCatalog};
pub use metadata::ProductMetadata;
