pub mod commands;
pub mod history;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pantry_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "pantry",
    about = "Purchase cadence forecasts from your own grocery history",
    long_about = "Reads a purchase history export, learns how often each product is bought, \
and recommends what to buy next: a ranked list, a per-product explanation, or a shopping list.",
    after_help = "Examples:\n  pantry rank --history history.json\n  pantry detail prod-milk --history history.json --catalog catalog.json\n  pantry plan --history history.json --days 7 --json\n  pantry config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file path (default: pantry.toml, config/pantry.toml)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank products by how urgently they need re-buying")]
    Rank {
        #[arg(long, help = "Purchase history JSON file")]
        history: PathBuf,
        #[arg(long, help = "Product catalog JSON file for display enrichment")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Maximum number of recommendations")]
        limit: Option<usize>,
        #[arg(long, help = "Minimum confidence for a product to be listed")]
        min_confidence: Option<f64>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Explain the buying cadence and forecast for one product")]
    Detail {
        #[arg(help = "Product id as it appears in the history file")]
        product_id: String,
        #[arg(long, help = "Purchase history JSON file")]
        history: PathBuf,
        #[arg(long, help = "Product catalog JSON file for display enrichment")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Build a shopping list for the coming days")]
    Plan {
        #[arg(long, help = "Purchase history JSON file")]
        history: PathBuf,
        #[arg(long, help = "Product catalog JSON file for display enrichment")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Planning horizon in days")]
        days: Option<i64>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use pantry_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let mut overrides =
        ConfigOverrides { log_level: cli.log_level.clone(), ..ConfigOverrides::default() };
    match &cli.command {
        Command::Rank { limit, min_confidence, .. } => {
            overrides.max_results = *limit;
            overrides.min_confidence = *min_confidence;
        }
        Command::Plan { days, .. } => overrides.planning_horizon_days = *days,
        _ => {}
    }

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: false,
        overrides,
    }) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(2);
        }
    };

    init_logging(&config);

    let result = match cli.command {
        Command::Rank { history, catalog, json, .. } => {
            commands::rank::run(&config, &history, catalog.as_deref(), json).await
        }
        Command::Detail { product_id, history, catalog, json } => {
            commands::detail::run(&config, &product_id, &history, catalog.as_deref(), json).await
        }
        Command::Plan { history, catalog, json, .. } => {
            commands::plan::run(&config, &history, catalog.as_deref(), json).await
        }
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(&config, cli.config.as_deref(), cli.log_level.is_some()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
