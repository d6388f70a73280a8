//! ime-repair - Intune app repair tool
//!
//! Recovers Win32 app identifiers from the Intune Management Extension logs
//! and purges the registry state the extension keeps for them, then restarts
//! the extension service and relaunches Company Portal.

use chrono::Local;
use clap::Parser;
use console::Style;
use tracing_subscriber::EnvFilter;

mod cleanup;
mod cli;
mod commands;
mod config;
mod discovery;
mod error;
mod progress;
mod repair;
mod sink;
mod store;
mod system;
#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use config::RepairConfig;
use error::Result;

/// Diagnostics go to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Completions must work even with a broken config file
    let load_config = || {
        let config = RepairConfig::load(cli.config.as_deref(), cli.log_dir.clone())?;
        tracing::debug!(?config, "configuration loaded");
        Ok::<_, error::RepairError>(config)
    };

    match cli.command {
        Some(Commands::List(args)) => commands::list::run(&load_config()?, args),
        Some(Commands::Cleanup(args)) => commands::cleanup::run(&load_config()?, args),
        Some(Commands::Completions(args)) => commands::completions::run(args),
        None => commands::interactive::run(&load_config()?),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    eprintln!(
        "{}",
        Style::new().dim().apply_to(format!(
            "ime-repair {} started at {}",
            env!("CARGO_PKG_VERSION"),
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
    );

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
