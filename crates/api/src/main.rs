//! PharmaClock - geofenced pharmacy time clock
//!
//! Entry point for the `pharmaclock` command-line client.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pharmaclock_domain::Config;
use pharmaclock_infra::config;
use pharmaclock_infra::observability::init_tracing;
use pharmaclock_lib::commands::{self, status};
use pharmaclock_lib::{AppContext, Cli, Command, TerminalConfirmer};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    // Environment from .env must be in place before the config is read
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("warning: could not read .env: {err}");
        }
    }

    let cli = Cli::parse();
    let ctx = match bootstrap(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(2);
        }
    };

    let result = match &cli.command {
        Command::Status { watch: true } => {
            status::watch(&ctx, |line| println!("{line}"), shutdown_signal()).await.map(|()| None)
        }
        command => commands::execute(&ctx, command).await.map(Some),
    };

    match result {
        Ok(Some(output)) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn bootstrap(cli: &Cli) -> anyhow::Result<AppContext> {
    let mut config = load_config(cli)?;
    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    init_tracing(&config.logging).context("failed to initialize logging")?;
    debug!(store = %config.store.url, "configuration loaded");

    let confirmer = Arc::new(TerminalConfirmer::new(cli.yes));
    AppContext::new(config, confirmer).context("failed to build application context")
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone()))
            .with_context(|| format!("failed to load {}", path.display())),
        None => config::load().context("failed to load configuration"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
    }
}
