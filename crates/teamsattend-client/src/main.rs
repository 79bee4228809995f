//! teamsattend CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use teamsattend_core::{TracingConfig, init_tracing};
use tracing::warn;

use teamsattend_client::cli::{Cli, Command, ConfigAction};
use teamsattend_client::commands;
use teamsattend_client::config::ClientConfig;
use teamsattend_client::error::{ClientError, ClientResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config.with_format(cli.log_format)) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().unwrap_or_else(|e| {
            warn!("{}, using defaults", e);
            ClientConfig::default()
        })
    };

    match &cli.command {
        Some(Command::Auth { save }) => commands::auth::run(&cli, &config, *save).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => {
                commands::config::validate(&config, cli.identity_overrides())
            }
            ConfigAction::Path => commands::config::path(&config_path),
        },
        None => commands::run::run(&cli, &config).await,
    }
}
