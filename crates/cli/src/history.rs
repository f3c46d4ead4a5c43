//! Input files: the purchase history export and the optional catalog file.
//!
//! History format:
//! ```json
//! {
//!   "as_of": "2026-03-01",
//!   "products": {
//!     "prod-milk": [
//!       { "occurred_on": "2026-02-22", "quantity": 2, "unit_price": "1.29" }
//!     ]
//!   }
//! }
//! ```
//! `as_of` is optional; when present it pins validation and forecasting to
//! that date so a saved export keeps producing the same report.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use pantry_catalog::{ProductMetadata, StaticCatalog};
use pantry_core::{ProductHistory, ProductId, PurchaseEvent, PurchaseLedger};

#[derive(Debug, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    as_of: Option<NaiveDate>,
    products: BTreeMap<String, Vec<EventRow>>,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    occurred_on: NaiveDate,
    quantity: Decimal,
    #[serde(default)]
    unit_price: Option<Decimal>,
}

#[derive(Debug)]
pub struct HistoryInput {
    pub ledger: PurchaseLedger,
    /// The file's pinned date, if it carried one.
    pub as_of: Option<NaiveDate>,
}

pub fn load_history(path: &Path, default_as_of: NaiveDate) -> Result<HistoryInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read history file `{}`", path.display()))?;
    let file: HistoryFile = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse history file `{}`", path.display()))?;

    let as_of = file.as_of;
    let effective = as_of.unwrap_or(default_as_of);

    let mut ledger = PurchaseLedger::new();
    for (product_id, rows) in file.products {
        let events: Vec<PurchaseEvent> = rows
            .into_iter()
            .map(|row| {
                let event = PurchaseEvent::new(row.occurred_on, row.quantity);
                match row.unit_price {
                    Some(price) => event.with_unit_price(price),
                    None => event,
                }
            })
            .collect();
        let history = ProductHistory::new(ProductId::new(product_id), events, effective)?;
        ledger.insert(history);
    }

    Ok(HistoryInput { ledger, as_of })
}

pub fn load_catalog(path: Option<&Path>) -> Result<StaticCatalog> {
    let Some(path) = path else {
        return Ok(StaticCatalog::new());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read catalog file `{}`", path.display()))?;
    let entries: HashMap<String, ProductMetadata> = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse catalog file `{}`", path.display()))?;

    Ok(entries.into_iter().map(|(id, metadata)| (ProductId::new(id), metadata)).collect())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use pantry_core::{HistoryError, ProductId};

    use super::{load_catalog, load_history};

    fn write_temp(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn history_file_round_trips_with_pinned_date() {
        let (_dir, path) = write_temp(
            r#"{
                "as_of": "2026-03-01",
                "products": {
                    "prod-milk": [
                        { "occurred_on": "2026-02-15", "quantity": 2, "unit_price": "1.29" },
                        { "occurred_on": "2026-02-22", "quantity": 2 }
                    ]
                }
            }"#,
        );

        let input = load_history(&path, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()).unwrap();

        assert_eq!(input.as_of, NaiveDate::from_ymd_opt(2026, 3, 1));
        let history = input.ledger.get(&ProductId::from("prod-milk")).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.interval_count(), 1);
    }

    #[test]
    fn history_validation_errors_carry_the_product() {
        let (_dir, path) = write_temp(
            r#"{
                "products": {
                    "prod-milk": [
                        { "occurred_on": "2026-02-22", "quantity": 2 },
                        { "occurred_on": "2026-02-15", "quantity": 2 }
                    ]
                }
            }"#,
        );

        let error = load_history(&path, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
            .unwrap_err();

        let history_error = error.downcast_ref::<HistoryError>();
        assert!(
            matches!(history_error, Some(HistoryError::OutOfOrder { .. })),
            "expected an out-of-order rejection, got {error:?}",
        );
    }

    #[test]
    fn catalog_defaults_to_empty_without_a_file() {
        let catalog = load_catalog(None).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn catalog_file_accepts_partial_metadata() {
        let (_dir, path) = write_temp(
            r#"{
                "prod-milk": { "title": "Whole Milk 1L", "price": "1.29" },
                "prod-bread": { "title": "Sourdough Loaf" }
            }"#,
        );

        let catalog = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
