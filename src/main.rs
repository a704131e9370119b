//! vramslot - single-slot accelerator runner cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vramslot::cli::commands::{self, Context};
use vramslot::cli::{Cli, Commands, LogFormat};
use vramslot::config::ConfigManager;
use vramslot::error::VramslotResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> VramslotResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("vramslot=warn"),
        1 => EnvFilter::new("vramslot=info"),
        _ => EnvFilter::new("vramslot=debug"),
    };

    let log_format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));
    match log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    debug!("Using config {}", config_manager.path().display());

    let ctx = Context::new(config, config_manager);

    match cli.command {
        Commands::Variants(args) => commands::variants(args, &ctx).await,
        Commands::Check => commands::check(&ctx).await,
        Commands::Describe(args) => commands::describe(args, &ctx).await,
        Commands::Fetch(args) => commands::fetch(args, &ctx).await,
        Commands::Mux(args) => commands::mux(args).await,
        Commands::Config(args) => commands::config(args, &ctx).await,
    }
}
