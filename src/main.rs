//! mur - package manager for agent and tool artifacts
//!
//! Publishes artifacts to the managed registry or a private package index and
//! installs them, with the tools they use, through pip.

use clap::Parser;
use console::Style;
use tracing_subscriber::EnvFilter;

mod api;
mod auth;
mod cli;
mod commands;
mod config;
mod error;
mod installer;
mod manifest;
mod progress;
mod registry;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use commands::CommandContext;
use error::{MurError, Result};

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(command: Commands, verbose: bool) -> Result<()> {
    match command {
        Commands::Install(args) => commands::install::run(&CommandContext::from_env(verbose)?, args),
        Commands::Uninstall(args) => {
            commands::uninstall::run(&CommandContext::from_env(verbose)?, args)
        }
        Commands::Publish(args) => commands::publish::run(&CommandContext::from_env(verbose)?, args),
        Commands::Config(args) => commands::config::run(&CommandContext::from_env(verbose)?, args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn report_error(e: &MurError) {
    eprintln!(
        "{} {e} {}",
        Style::new().red().bold().apply_to("Error:"),
        Style::new().dim().apply_to(format!("[{}]", e.code()))
    );
    if let Some(detail) = e.detail() {
        eprintln!("  {detail}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli.command, cli.verbose) {
        report_error(&e);
        std::process::exit(1);
    }
}
