use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hh_harvest::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "hh_harvest",
    version,
    about = "Collect hh.ru vacancies and derive skills, grade and salary buckets",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect vacancies for the configured queries and write CSV files
    Collect {
        /// Search query; repeat to replace the configured list
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Vocabulary TOML file replacing the built-in keyword lists
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },

    /// Flatten list columns and strip markup in a collected CSV file
    Clean {
        /// Input CSV file
        input: PathBuf,

        /// Output path (defaults to `<input>_cleaned.csv`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the built-in vocabulary as TOML
    Vocabulary {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("hh_harvest starting");

    match cli.command {
        Commands::Collect {
            queries,
            output,
            vocabulary,
        } => {
            tracing::info!(
                queries = ?queries,
                output = ?output,
                vocabulary = ?vocabulary,
                "Starting collect command"
            );
            commands::collect(config, queries, output, vocabulary).await?;
        }

        Commands::Clean { input, output } => {
            tracing::info!(input = %input.display(), output = ?output, "Starting clean command");
            commands::clean(&config, &input, output)?;
        }

        Commands::Vocabulary { output } => {
            commands::vocabulary(output)?;
        }
    }

    tracing::info!("hh_harvest completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("hh_harvest=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("hh_harvest={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
