use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use pantry_core::config::AppConfig;

pub fn run(config: &AppConfig, explicit_path: Option<&Path>, log_level_overridden: bool) -> String {
    let config_file_path = detect_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    lines.push(render_line(
        "cadence.decay_rate",
        &config.cadence.decay_rate.to_string(),
        source("cadence.decay_rate", &["PANTRY_CADENCE_DECAY_RATE"]),
    ));
    lines.push(render_line(
        "cadence.recency_width",
        &config.cadence.recency_width.to_string(),
        source("cadence.recency_width", &["PANTRY_CADENCE_RECENCY_WIDTH"]),
    ));
    lines.push(render_line(
        "cadence.saturation_samples",
        &config.cadence.saturation_samples.to_string(),
        source("cadence.saturation_samples", &["PANTRY_CADENCE_SATURATION_SAMPLES"]),
    ));

    lines.push(render_line(
        "ranking.min_confidence",
        &config.ranking.min_confidence.to_string(),
        source("ranking.min_confidence", &["PANTRY_RANKING_MIN_CONFIDENCE"]),
    ));
    lines.push(render_line(
        "ranking.max_results",
        &config.ranking.max_results.to_string(),
        source("ranking.max_results", &["PANTRY_RANKING_MAX_RESULTS"]),
    ));
    lines.push(render_line(
        "ranking.min_samples",
        &config.ranking.min_samples.to_string(),
        source("ranking.min_samples", &["PANTRY_RANKING_MIN_SAMPLES"]),
    ));

    lines.push(render_line(
        "shopping.planning_horizon_days",
        &config.shopping.planning_horizon_days.to_string(),
        source("shopping.planning_horizon_days", &["PANTRY_SHOPPING_PLANNING_HORIZON_DAYS"]),
    ));

    lines.push(render_line(
        "catalog.ttl_days",
        &config.catalog.ttl_days.to_string(),
        source("catalog.ttl_days", &["PANTRY_CATALOG_TTL_DAYS"]),
    ));
    lines.push(render_line(
        "catalog.fetch_timeout_secs",
        &config.catalog.fetch_timeout_secs.to_string(),
        source("catalog.fetch_timeout_secs", &["PANTRY_CATALOG_FETCH_TIMEOUT_SECS"]),
    ));
    lines.push(render_line(
        "catalog.max_batch_size",
        &config.catalog.max_batch_size.to_string(),
        source("catalog.max_batch_size", &["PANTRY_CATALOG_MAX_BATCH_SIZE"]),
    ));

    let logging_level_source = if log_level_overridden {
        "flag (--log-level)".to_string()
    } else {
        source("logging.level", &["PANTRY_LOGGING_LEVEL", "PANTRY_LOG_LEVEL"])
    };
    lines.push(render_line("logging.level", &config.logging.level, logging_level_source));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["PANTRY_LOGGING_FORMAT", "PANTRY_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("pantry.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/pantry.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
