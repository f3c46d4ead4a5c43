use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forecast::{
    DEFAULT_DECAY_RATE, DEFAULT_MAX_RESULTS, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SAMPLES,
    DEFAULT_RECENCY_WIDTH, DEFAULT_SATURATION_SAMPLES,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub cadence: CadenceConfig,
    pub ranking: RankingConfig,
    pub shopping: ShoppingConfig,
    pub catalog: CatalogSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CadenceConfig {
    /// Exponential decay applied to interval ages, per day.
    pub decay_rate: f64,
    /// Recency window width as a fraction of the mean interval.
    pub recency_width: f64,
    /// Intervals needed for full history-depth confidence.
    pub saturation_samples: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankingConfig {
    pub min_confidence: f64,
    pub max_results: usize,
    /// Minimum interval count for eligibility.
    pub min_samples: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShoppingConfig {
    /// Days ahead the shopping list plans for.
    pub planning_horizon_days: i64,
}

/// Plain-data knobs for the product-metadata cache; the catalog crate
/// turns these into its runtime configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogSettings {
    pub ttl_days: u32,
    pub fetch_timeout_secs: u64,
    pub max_batch_size: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub min_confidence: Option<f64>,
    pub max_results: Option<usize>,
    pub planning_horizon_days: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            decay_rate: DEFAULT_DECAY_RATE,
            recency_width: DEFAULT_RECENCY_WIDTH,
            saturation_samples: DEFAULT_SATURATION_SAMPLES,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_results: DEFAULT_MAX_RESULTS,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self { planning_horizon_days: 4 }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { ttl_days: 7, fetch_timeout_secs: 3, max_batch_size: 50 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("pantry.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(cadence) = patch.cadence {
            if let Some(decay_rate) = cadence.decay_rate {
                self.cadence.decay_rate = decay_rate;
            }
            if let Some(recency_width) = cadence.recency_width {
                self.cadence.recency_width = recency_width;
            }
            if let Some(saturation_samples) = cadence.saturation_samples {
                self.cadence.saturation_samples = saturation_samples;
            }
        }

        if let Some(ranking) = patch.ranking {
            if let Some(min_confidence) = ranking.min_confidence {
                self.ranking.min_confidence = min_confidence;
            }
            if let Some(max_results) = ranking.max_results {
                self.ranking.max_results = max_results;
            }
            if let Some(min_samples) = ranking.min_samples {
                self.ranking.min_samples = min_samples;
            }
        }

        if let Some(shopping) = patch.shopping {
            if let Some(planning_horizon_days) = shopping.planning_horizon_days {
                self.shopping.planning_horizon_days = planning_horizon_days;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(ttl_days) = catalog.ttl_days {
                self.catalog.ttl_days = ttl_days;
            }
            if let Some(fetch_timeout_secs) = catalog.fetch_timeout_secs {
                self.catalog.fetch_timeout_secs = fetch_timeout_secs;
            }
            if let Some(max_batch_size) = catalog.max_batch_size {
                self.catalog.max_batch_size = max_batch_size;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PANTRY_CADENCE_DECAY_RATE") {
            self.cadence.decay_rate = parse_f64("PANTRY_CADENCE_DECAY_RATE", &value)?;
        }
        if let Some(value) = read_env("PANTRY_CADENCE_RECENCY_WIDTH") {
            self.cadence.recency_width = parse_f64("PANTRY_CADENCE_RECENCY_WIDTH", &value)?;
        }
        if let Some(value) = read_env("PANTRY_CADENCE_SATURATION_SAMPLES") {
            self.cadence.saturation_samples =
                parse_u32("PANTRY_CADENCE_SATURATION_SAMPLES", &value)?;
        }

        if let Some(value) = read_env("PANTRY_RANKING_MIN_CONFIDENCE") {
            self.ranking.min_confidence = parse_f64("PANTRY_RANKING_MIN_CONFIDENCE", &value)?;
        }
        if let Some(value) = read_env("PANTRY_RANKING_MAX_RESULTS") {
            self.ranking.max_results = parse_usize("PANTRY_RANKING_MAX_RESULTS", &value)?;
        }
        if let Some(value) = read_env("PANTRY_RANKING_MIN_SAMPLES") {
            self.ranking.min_samples = parse_u32("PANTRY_RANKING_MIN_SAMPLES", &value)?;
        }

        if let Some(value) = read_env("PANTRY_SHOPPING_PLANNING_HORIZON_DAYS") {
            self.shopping.planning_horizon_days =
                parse_i64("PANTRY_SHOPPING_PLANNING_HORIZON_DAYS", &value)?;
        }

        if let Some(value) = read_env("PANTRY_CATALOG_TTL_DAYS") {
            self.catalog.ttl_days = parse_u32("PANTRY_CATALOG_TTL_DAYS", &value)?;
        }
        if let Some(value) = read_env("PANTRY_CATALOG_FETCH_TIMEOUT_SECS") {
            self.catalog.fetch_timeout_secs =
                parse_u64("PANTRY_CATALOG_FETCH_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("PANTRY_CATALOG_MAX_BATCH_SIZE") {
            self.catalog.max_batch_size = parse_usize("PANTRY_CATALOG_MAX_BATCH_SIZE", &value)?;
        }

        let log_level = read_env("PANTRY_LOGGING_LEVEL").or_else(|| read_env("PANTRY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PANTRY_LOGGING_FORMAT").or_else(|| read_env("PANTRY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(min_confidence) = overrides.min_confidence {
            self.ranking.min_confidence = min_confidence;
        }
        if let Some(max_results) = overrides.max_results {
            self.ranking.max_results = max_results;
        }
        if let Some(planning_horizon_days) = overrides.planning_horizon_days {
            self.shopping.planning_horizon_days = planning_horizon_days;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_cadence(&self.cadence)?;
        validate_ranking(&self.ranking)?;
        validate_shopping(&self.shopping)?;
        validate_catalog(&self.catalog)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("pantry.toml"), PathBuf::from("config/pantry.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_cadence(cadence: &CadenceConfig) -> Result<(), ConfigError> {
    if !(0.001..=0.1).contains(&cadence.decay_rate) {
        return Err(ConfigError::Validation(
            "cadence.decay_rate must be in range 0.001..=0.1".to_string(),
        ));
    }

    if !(cadence.recency_width > 0.0 && cadence.recency_width <= 2.0) {
        return Err(ConfigError::Validation(
            "cadence.recency_width must be greater than 0 and at most 2".to_string(),
        ));
    }

    if cadence.saturation_samples == 0 {
        return Err(ConfigError::Validation(
            "cadence.saturation_samples must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_ranking(ranking: &RankingConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&ranking.min_confidence) {
        return Err(ConfigError::Validation(
            "ranking.min_confidence must be in range 0.0..=1.0".to_string(),
        ));
    }

    if ranking.max_results == 0 {
        return Err(ConfigError::Validation(
            "ranking.max_results must be greater than zero".to_string(),
        ));
    }

    if ranking.min_samples == 0 {
        return Err(ConfigError::Validation(
            "ranking.min_samples must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_shopping(shopping: &ShoppingConfig) -> Result<(), ConfigError> {
    if !(1..=30).contains(&shopping.planning_horizon_days) {
        return Err(ConfigError::Validation(
            "shopping.planning_horizon_days must be in range 1..=30".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogSettings) -> Result<(), ConfigError> {
    if catalog.ttl_days == 0 {
        return Err(ConfigError::Validation(
            "catalog.ttl_days must be greater than zero".to_string(),
        ));
    }

    if !(1..=60).contains(&catalog.fetch_timeout_secs) {
        return Err(ConfigError::Validation(
            "catalog.fetch_timeout_secs must be in range 1..=60".to_string(),
        ));
    }

    if !(1..=100).contains(&catalog.max_batch_size) {
        return Err(ConfigError::Validation(
            "catalog.max_batch_size must be in range 1..=100".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_i64(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    cadence: Option<CadencePatch>,
    ranking: Option<RankingPatch>,
    shopping: Option<ShoppingPatch>,
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CadencePatch {
    decay_rate: Option<f64>,
    recency_width: Option<f64>,
    saturation_samples: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPatch {
    min_confidence: Option<f64>,
    max_results: Option<usize>,
    min_samples: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingPatch {
    planning_horizon_days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    ttl_days: Option<u32>,
    fetch_timeout_secs: Option<u64>,
    max_batch_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const ALL_VARS: &[&str] = &[
        "PANTRY_CADENCE_DECAY_RATE",
        "PANTRY_CADENCE_RECENCY_WIDTH",
        "PANTRY_CADENCE_SATURATION_SAMPLES",
        "PANTRY_RANKING_MIN_CONFIDENCE",
        "PANTRY_RANKING_MAX_RESULTS",
        "PANTRY_RANKING_MIN_SAMPLES",
        "PANTRY_SHOPPING_PLANNING_HORIZON_DAYS",
        "PANTRY_CATALOG_TTL_DAYS",
        "PANTRY_CATALOG_FETCH_TIMEOUT_SECS",
        "PANTRY_CATALOG_MAX_BATCH_SIZE",
        "PANTRY_LOGGING_LEVEL",
        "PANTRY_LOG_LEVEL",
        "PANTRY_LOGGING_FORMAT",
        "PANTRY_LOG_FORMAT",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn with_env<F>(vars: &[(&str, &str)], test: F) -> Result<(), String>
    where
        F: FnOnce() -> Result<(), String>,
    {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        for var in ALL_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = test();

        for var in ALL_VARS {
            env::remove_var(var);
        }
        result
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    fn absent_path(dir: &TempDir) -> LoadOptions {
        LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            ..LoadOptions::default()
        }
    }

    #[test]
    fn defaults_load_and_validate_without_a_file() -> Result<(), String> {
        with_env(&[], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let config = AppConfig::load(absent_path(&dir))
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                (config.cadence.decay_rate - 0.00631).abs() < 1e-9,
                "default decay rate should give one-year-old intervals ~10% weight",
            )?;
            ensure(config.catalog.ttl_days == 7, "default metadata TTL should be 7 days")?;
            ensure(config.ranking.max_results == 20, "default max results should be 20")?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })
    }

    #[test]
    fn file_patch_overrides_defaults() -> Result<(), String> {
        with_env(&[], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("pantry.toml");
            fs::write(
                &path,
                r#"
[cadence]
decay_rate = 0.01

[ranking]
max_results = 5

[logging]
level = "debug"
format = "json"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure((config.cadence.decay_rate - 0.01).abs() < 1e-12, "file decay rate should win")?;
            ensure(config.ranking.max_results == 5, "file max results should win")?;
            ensure(config.ranking.min_samples == 1, "untouched fields keep their defaults")?;
            ensure(config.logging.level == "debug", "file log level should win")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "file log format should win",
            )?;
            Ok(())
        })
    }

    #[test]
    fn env_wins_over_file_and_overrides_win_over_env() -> Result<(), String> {
        with_env(
            &[("PANTRY_RANKING_MAX_RESULTS", "9"), ("PANTRY_RANKING_MIN_CONFIDENCE", "0.5")],
            || {
                let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
                let path = dir.path().join("pantry.toml");
                fs::write(
                    &path,
                    r#"
[ranking]
max_results = 5
min_confidence = 0.3
"#,
                )
                .map_err(|err| err.to_string())?;

                let config = AppConfig::load(LoadOptions {
                    config_path: Some(path),
                    overrides: ConfigOverrides {
                        min_confidence: Some(0.2),
                        ..ConfigOverrides::default()
                    },
                    ..LoadOptions::default()
                })
                .map_err(|err| format!("config load failed: {err}"))?;

                ensure(config.ranking.max_results == 9, "env max results should beat the file")?;
                ensure(
                    (config.ranking.min_confidence - 0.2).abs() < 1e-12,
                    "explicit override should beat env and file",
                )?;
                Ok(())
            },
        )
    }

    #[test]
    fn log_level_alias_is_supported() -> Result<(), String> {
        with_env(&[("PANTRY_LOG_LEVEL", "warn"), ("PANTRY_LOG_FORMAT", "pretty")], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let config = AppConfig::load(absent_path(&dir))
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "short env alias should set the level")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "short env alias should set the format",
            )?;
            Ok(())
        })
    }

    #[test]
    fn required_file_missing_is_a_typed_error() -> Result<(), String> {
        with_env(&[], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let result = AppConfig::load(LoadOptions {
                config_path: Some(dir.path().join("absent.toml")),
                require_file: true,
                ..LoadOptions::default()
            });

            ensure(
                matches!(result, Err(ConfigError::MissingConfigFile(_))),
                "missing required file should be MissingConfigFile",
            )
        })
    }

    #[test]
    fn unparseable_file_is_a_typed_error() -> Result<(), String> {
        with_env(&[], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("pantry.toml");
            fs::write(&path, "not valid toml [[[").map_err(|err| err.to_string())?;

            let result =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
            ensure(
                matches!(result, Err(ConfigError::ParseFile { .. })),
                "garbage file should be ParseFile",
            )
        })
    }

    #[test]
    fn out_of_range_decay_rate_fails_validation() -> Result<(), String> {
        with_env(&[("PANTRY_CADENCE_DECAY_RATE", "0.5")], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let result = AppConfig::load(absent_path(&dir));

            let named_field = matches!(
                result,
                Err(ConfigError::Validation(ref message)) if message.contains("cadence.decay_rate")
            );
            ensure(named_field, "validation failure should name cadence.decay_rate")
        })
    }

    #[test]
    fn zero_max_results_fails_validation() -> Result<(), String> {
        with_env(&[("PANTRY_RANKING_MAX_RESULTS", "0")], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let result = AppConfig::load(absent_path(&dir));

            let named_field = matches!(
                result,
                Err(ConfigError::Validation(ref message)) if message.contains("ranking.max_results")
            );
            ensure(named_field, "validation failure should name ranking.max_results")
        })
    }

    #[test]
    fn malformed_env_number_is_a_typed_error() -> Result<(), String> {
        with_env(&[("PANTRY_CATALOG_TTL_DAYS", "one-week")], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let result = AppConfig::load(absent_path(&dir));

            ensure(
                matches!(
                    result,
                    Err(ConfigError::InvalidEnvOverride { ref key, .. })
                        if key == "PANTRY_CATALOG_TTL_DAYS"
                ),
                "unparseable env number should be InvalidEnvOverride",
            )
        })
    }

    #[test]
    fn empty_env_values_are_ignored() -> Result<(), String> {
        with_env(&[("PANTRY_RANKING_MAX_RESULTS", "  ")], || {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let config = AppConfig::load(absent_path(&dir))
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.ranking.max_results == 20, "blank env value should keep the default")
        })
    }
}
