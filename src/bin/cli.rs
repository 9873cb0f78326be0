//! Global data collector CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use collector::{
    error::Result,
    models::{Category, Config},
    pipeline,
};

/// Collects public web, API and news data into SQLite and JSON
#[derive(Parser, Debug)]
#[command(name = "collector", version, about = "Global data collector")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "collector.toml", global = true)]
    config: PathBuf,

    /// Override the data directory from the configuration
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect every configured source and write the summary report
    Collect {
        /// Number of sources collected at the same time
        #[arg(short, long)]
        workers: Option<usize>,

        /// Only collect one category (web, api, news, dataset, government, social)
        #[arg(long)]
        only: Option<Category>,
    },

    /// Scrape a single web page
    Scrape { url: String },

    /// Fetch a single JSON API endpoint
    Fetch {
        url: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Read a single RSS / Atom feed
    Feed { url: String },

    /// Rebuild the summary report from stored data
    Report,

    /// Validate the configuration file
    Validate,

    /// Write the built-in configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Initialize logging from the flags, falling back to the configured level.
fn init_logging(cli: &Cli, config_level: &str) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        config_level
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    match cli.command {
        Command::Collect { workers, only } => {
            if let Some(workers) = workers {
                config.http.max_concurrent = workers;
            }

            tokio::select! {
                result = pipeline::run_collection(&config, only) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    log::warn!("Data collection interrupted by user");
                }
            }
        }
        Command::Scrape { url } => {
            pipeline::run_scrape(&config, &url).await?;
        }
        Command::Fetch { url, params } => {
            let params = pipeline::parse_params(&params)?;
            pipeline::run_fetch(&config, &url, &params).await?;
        }
        Command::Feed { url } => {
            pipeline::run_feed(&config, &url).await?;
        }
        Command::Report => {
            pipeline::run_report(&config).await?;
        }
        Command::Validate => pipeline::run_validate(&config)?,
        Command::Init { force } => {
            if cli.config.exists() && !force {
                log::warn!(
                    "Config already exists at {}. Use --force to overwrite.",
                    cli.config.display()
                );
                return Ok(());
            }
            Config::default().save(&cli.config)?;
            log::info!("Config written to {}", cli.config.display());
        }
    }

    Ok(())
}

/// Load the configuration a command runs with.
///
/// `init` never reads the file, so it can replace a broken one. Otherwise a
/// missing file means built-in defaults and an unreadable one is an error.
fn startup_config(cli: &Cli) -> Result<Config> {
    if matches!(cli.command, Command::Init { .. }) || !cli.config.exists() {
        return Ok(Config::default());
    }
    Config::load(&cli.config)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = startup_config(&cli);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&cli, &level);

    let result = match loaded {
        Ok(config) => {
            if matches!(cli.command, Command::Init { .. }) {
                log::debug!("Skipping configuration load for init");
            } else if cli.config.exists() {
                log::info!("Loaded configuration from {}", cli.config.display());
            } else {
                log::info!(
                    "No configuration at {}, using built-in sources",
                    cli.config.display()
                );
            }
            run(cli, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        log::error!("Unexpected error during data collection: {}", e);
    }

    log::info!("Data collection process completed");
    result
}
