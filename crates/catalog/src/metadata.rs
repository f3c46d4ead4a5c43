use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display enrichment for a product. None of these fields feed the
/// cadence math; they only dress up reports and shopping lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit_size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl ProductMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            brand: None,
            category: None,
            unit_size: None,
            image_url: None,
            price: None,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unit_size(mut self, unit_size: impl Into<String>) -> Self {
        self.unit_size = Some(unit_size.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}
