use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::history::ProductId;

/// Rejection reasons for raw purchase history.
///
/// History is validated once, at construction. Nothing downstream reorders
/// or repairs events, so every variant here means the input itself is bad
/// and the whole load must fail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("purchase history for `{product_id}` is empty")]
    Empty { product_id: ProductId },
    #[error(
        "purchase history for `{product_id}` is out of order at index {index}: \
         {current} is before {previous}"
    )]
    OutOfOrder { product_id: ProductId, index: usize, previous: NaiveDate, current: NaiveDate },
    #[error("negative quantity {quantity} for `{product_id}` on {occurred_on}")]
    NegativeQuantity { product_id: ProductId, occurred_on: NaiveDate, quantity: Decimal },
    #[error("negative unit price {unit_price} for `{product_id}` on {occurred_on}")]
    NegativePrice { product_id: ProductId, occurred_on: NaiveDate, unit_price: Decimal },
    #[error("future-dated purchase for `{product_id}`: {occurred_on} is after {as_of}")]
    FutureDated { product_id: ProductId, occurred_on: NaiveDate, as_of: NaiveDate },
}
