pub mod report;
pub mod service;

pub use report::{
    ProductDetail, RankedProduct, RecommendationReport, ShoppingItem, ShoppingList,
};
pub use service::{RecommendationService, ServiceError};
