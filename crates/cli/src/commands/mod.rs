pub mod config;
pub mod detail;
pub mod plan;
pub mod rank;

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveTime;
use serde::Serialize;

use pantry_catalog::{CacheConfig, ProductCache};
use pantry_core::config::AppConfig;
use pantry_core::{Clock, FixedClock, HistoryError, PurchaseLedger, SystemClock};
use pantry_service::{RecommendationService, ServiceError};

use crate::history;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct ErrorOutcome {
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn json<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure("serialization", error.to_string(), 1, true),
        }
    }

    pub fn failure(
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        json: bool,
    ) -> Self {
        let message = message.into();
        let output = if json {
            let payload = ErrorOutcome {
                status: "error".to_string(),
                error_class: error_class.to_string(),
                message: message.clone(),
            };
            serde_json::to_string_pretty(&payload).unwrap_or(message)
        } else {
            format!("error ({error_class}): {message}")
        };
        Self { exit_code, output }
    }
}

/// Maps an error chain to an error class and exit code: 2 for bad input,
/// 1 for everything the user cannot fix by editing their files.
pub(crate) fn failure_from(error: &anyhow::Error, json: bool) -> CommandResult {
    let (error_class, exit_code) = classify(error);
    CommandResult::failure(error_class, format!("{error:#}"), exit_code, json)
}

fn classify(error: &anyhow::Error) -> (&'static str, u8) {
    if error.downcast_ref::<HistoryError>().is_some() {
        return ("invalid_history", 2);
    }
    if error.downcast_ref::<serde_json::Error>().is_some() {
        return ("invalid_input", 2);
    }
    match error.downcast_ref::<ServiceError>() {
        Some(ServiceError::UnknownProduct(_)) => ("unknown_product", 2),
        Some(ServiceError::Catalog(_)) => ("catalog", 1),
        None => ("runtime", 1),
    }
}

/// Loads the input files and assembles the service. A pinned `as_of` in the
/// history file fixes the clock so saved exports replay identically.
pub(crate) fn build_runtime(
    config: &AppConfig,
    history_path: &Path,
    catalog_path: Option<&Path>,
) -> anyhow::Result<(RecommendationService, PurchaseLedger)> {
    let today = SystemClock.today();
    let input = history::load_history(history_path, today)?;
    let catalog = history::load_catalog(catalog_path)?;

    let clock: Arc<dyn Clock> = match input.as_of {
        Some(date) => Arc::new(FixedClock(date.and_time(NaiveTime::MIN).and_utc())),
        None => Arc::new(SystemClock),
    };

    let cache = Arc::new(ProductCache::with_clock(
        Arc::new(catalog),
        CacheConfig::from_settings(&config.catalog),
        clock.clone(),
    ));
    let service = RecommendationService::with_clock(config, cache, clock);

    Ok((service, input.ledger))
}
