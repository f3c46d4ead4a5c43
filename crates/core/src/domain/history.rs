//! Purchase history: raw events and their validated per-product form.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::HistoryError;

/// The retailer's stable product key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One purchase of one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub occurred_on: NaiveDate,
    pub quantity: Decimal,
    /// Loyalty-card exports omit the price for some rows.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

impl PurchaseEvent {
    pub fn new(occurred_on: NaiveDate, quantity: Decimal) -> Self {
        Self { occurred_on, quantity, unit_price: None }
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}

/// A product's purchase events, validated and date-sorted.
///
/// Construction rejects out-of-order, negative-quantity, negative-price,
/// and future-dated events rather than repairing them. Events sharing a
/// date are merged into one (quantities summed, the latest price wins), so
/// consecutive events are always at least one day apart.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductHistory {
    product_id: ProductId,
    events: Vec<PurchaseEvent>,
}

impl ProductHistory {
    pub fn new(
        product_id: ProductId,
        events: Vec<PurchaseEvent>,
        as_of: NaiveDate,
    ) -> Result<Self, HistoryError> {
        if events.is_empty() {
            return Err(HistoryError::Empty { product_id });
        }

        for (index, pair) in events.windows(2).enumerate() {
            if pair[1].occurred_on < pair[0].occurred_on {
                return Err(HistoryError::OutOfOrder {
                    product_id,
                    index: index + 1,
                    previous: pair[0].occurred_on,
                    current: pair[1].occurred_on,
                });
            }
        }

        for event in &events {
            if event.quantity.is_sign_negative() && !event.quantity.is_zero() {
                return Err(HistoryError::NegativeQuantity {
                    product_id,
                    occurred_on: event.occurred_on,
                    quantity: event.quantity,
                });
            }
            if let Some(unit_price) = event.unit_price {
                if unit_price.is_sign_negative() && !unit_price.is_zero() {
                    return Err(HistoryError::NegativePrice {
                        product_id,
                        occurred_on: event.occurred_on,
                        unit_price,
                    });
                }
            }
            if event.occurred_on > as_of {
                return Err(HistoryError::FutureDated {
                    product_id,
                    occurred_on: event.occurred_on,
                    as_of,
                });
            }
        }

        let mut merged: Vec<PurchaseEvent> = Vec::with_capacity(events.len());
        for event in events {
            match merged.last_mut() {
                Some(last) if last.occurred_on == event.occurred_on => {
                    last.quantity += event.quantity;
                    if event.unit_price.is_some() {
                        last.unit_price = event.unit_price;
                    }
                }
                _ => merged.push(event),
            }
        }

        Ok(Self { product_id, events: merged })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Merged events, oldest first. Never empty.
    pub fn events(&self) -> &[PurchaseEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn last_purchase_on(&self) -> NaiveDate {
        self.events[self.events.len() - 1].occurred_on
    }

    /// Number of inter-purchase intervals, `events - 1`.
    pub fn interval_count(&self) -> usize {
        self.events.len() - 1
    }
}

/// Validated histories for a whole household, keyed and iterated in
/// `ProductId` order so repeated runs see products in the same sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PurchaseLedger {
    products: BTreeMap<ProductId, ProductHistory>,
}

impl PurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and group raw events, one entry per product. Fails on the
    /// first invalid product.
    pub fn from_events<I>(as_of: NaiveDate, events: I) -> Result<Self, HistoryError>
    where
        I: IntoIterator<Item = (ProductId, Vec<PurchaseEvent>)>,
    {
        let mut products = BTreeMap::new();
        for (product_id, product_events) in events {
            let history = ProductHistory::new(product_id.clone(), product_events, as_of)?;
            products.insert(product_id, history);
        }
        Ok(Self { products })
    }

    pub fn insert(&mut self, history: ProductHistory) {
        self.products.insert(history.product_id().clone(), history);
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&ProductHistory> {
        self.products.get(product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.contains_key(product_id)
    }

    pub fn histories(&self) -> impl Iterator<Item = &ProductHistory> {
        self.products.values()
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.products.keys()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn qty(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn rejects_empty_history() {
        let error = ProductHistory::new(ProductId::from("prod-milk"), vec![], date(2026, 6, 1))
            .unwrap_err();
        assert!(matches!(error, HistoryError::Empty { .. }));
    }

    #[test]
    fn rejects_out_of_order_events() {
        let events = vec![
            PurchaseEvent::new(date(2026, 5, 10), qty(1)),
            PurchaseEvent::new(date(2026, 5, 3), qty(1)),
        ];
        let error =
            ProductHistory::new(ProductId::from("prod-milk"), events, date(2026, 6, 1))
                .unwrap_err();
        assert!(matches!(error, HistoryError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn rejects_negative_quantity() {
        let events = vec![PurchaseEvent::new(date(2026, 5, 10), qty(-2))];
        let error =
            ProductHistory::new(ProductId::from("prod-milk"), events, date(2026, 6, 1))
                .unwrap_err();
        assert!(matches!(error, HistoryError::NegativeQuantity { .. }));
    }

    #[test]
    fn rejects_negative_unit_price() {
        let events =
            vec![PurchaseEvent::new(date(2026, 5, 10), qty(1)).with_unit_price(qty(-1))];
        let error =
            ProductHistory::new(ProductId::from("prod-milk"), events, date(2026, 6, 1))
                .unwrap_err();
        assert!(matches!(error, HistoryError::NegativePrice { .. }));
    }

    #[test]
    fn rejects_future_dated_events() {
        let events = vec![PurchaseEvent::new(date(2026, 6, 2), qty(1))];
        let error =
            ProductHistory::new(ProductId::from("prod-milk"), events, date(2026, 6, 1))
                .unwrap_err();
        assert!(matches!(
            error,
            HistoryError::FutureDated { occurred_on, .. } if occurred_on == date(2026, 6, 2)
        ));
    }

    #[test]
    fn merges_same_day_events() {
        let events = vec![
            PurchaseEvent::new(date(2026, 5, 10), qty(1)).with_unit_price(Decimal::new(129, 2)),
            PurchaseEvent::new(date(2026, 5, 10), qty(2)).with_unit_price(Decimal::new(135, 2)),
            PurchaseEvent::new(date(2026, 5, 17), qty(1)),
        ];
        let history =
            ProductHistory::new(ProductId::from("prod-milk"), events, date(2026, 6, 1)).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.events()[0].quantity, qty(3));
        assert_eq!(history.events()[0].unit_price, Some(Decimal::new(135, 2)));
        assert_eq!(history.interval_count(), 1);
    }

    #[test]
    fn equal_dates_are_accepted_as_sorted() {
        let events = vec![
            PurchaseEvent::new(date(2026, 5, 10), qty(1)),
            PurchaseEvent::new(date(2026, 5, 10), qty(1)),
        ];
        let history =
            ProductHistory::new(ProductId::from("prod-milk"), events, date(2026, 6, 1)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.interval_count(), 0);
    }

    #[test]
    fn ledger_iterates_in_product_id_order() {
        let as_of = date(2026, 6, 1);
        let ledger = PurchaseLedger::from_events(
            as_of,
            vec![
                (ProductId::from("prod-c"), vec![PurchaseEvent::new(date(2026, 5, 1), qty(1))]),
                (ProductId::from("prod-a"), vec![PurchaseEvent::new(date(2026, 5, 2), qty(1))]),
                (ProductId::from("prod-b"), vec![PurchaseEvent::new(date(2026, 5, 3), qty(1))]),
            ],
        )
        .unwrap();

        let ids: Vec<&str> = ledger.product_ids().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["prod-a", "prod-b", "prod-c"]);
    }

    #[test]
    fn ledger_load_fails_on_first_invalid_product() {
        let as_of = date(2026, 6, 1);
        let error = PurchaseLedger::from_events(
            as_of,
            vec![
                (ProductId::from("prod-a"), vec![PurchaseEvent::new(date(2026, 5, 1), qty(1))]),
                (ProductId::from("prod-b"), vec![]),
            ],
        )
        .unwrap_err();

        assert!(matches!(error, HistoryError::Empty { product_id } if product_id.as_str() == "prod-b"));
    }
}
