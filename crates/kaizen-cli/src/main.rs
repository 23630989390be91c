//! Kaizen CLI
//!
//! Consulting workflow: build the case index, analyze a process,
//! curate the results, export the deliverable.

use clap::Parser;
use kaizen_core::{Config, KaizenError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let result = match cli.command {
        Commands::Index(args) => commands::index::run(args, &config).await,
        Commands::Status(args) => commands::status::run(args, &config).await,
        Commands::Analyze(args) => commands::analyze::run(*args, &config, cli.format).await,
        Commands::Refine(args) => commands::refine::run(args, cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = e
            .downcast_ref::<KaizenError>()
            .map(KaizenError::exit_code)
            .unwrap_or(kaizen_core::error::exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}
