//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - publish: Publish command arguments
//! - config: Config command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod config;
pub mod install;
pub mod publish;
pub mod uninstall;

pub use completions::CompletionsArgs;
pub use config::{ConfigArgs, ConfigSubcommand};
pub use install::InstallArgs;
pub use publish::PublishArgs;
pub use uninstall::UninstallArgs;

/// mur - artifact package manager
///
/// Publish, install and uninstall agents and tools against the managed
/// registry or a private package index.
#[derive(Parser, Debug)]
#[command(
    name = "mur",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package manager for agent and tool artifacts",
    long_about = "mur publishes agent and tool artifacts to the managed registry or a private \
                  package index, and installs them together with the tools they use.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  mur install                       \x1b[90m# Install everything in murmur.yaml\x1b[0m\n   \
                  mur install my-agent              \x1b[90m# Install one artifact\x1b[0m\n   \
                  mur uninstall my-agent            \x1b[90m# Uninstall one artifact\x1b[0m\n   \
                  mur publish                       \x1b[90m# Publish the artifact in this directory\x1b[0m\n   \
                  mur config init                   \x1b[90m# Write default registry settings\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install artifacts from murmur.yaml or a single artifact
    Install(InstallArgs),

    /// Uninstall an artifact or everything in murmur.yaml
    Uninstall(UninstallArgs),

    /// Publish the artifact built in the current directory
    Publish(PublishArgs),

    /// Read and write registry settings in .murmurrc
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_install_manifest() {
        let cli = Cli::try_parse_from(["mur", "install"]).unwrap();
        match cli.command {
            Commands::Install(args) => assert_eq!(args.name, None),
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_global_verbose() {
        let cli = Cli::try_parse_from(["mur", "install", "my-agent", "-v"]).unwrap();
        assert!(cli.verbose);
        let cli = Cli::try_parse_from(["mur", "--verbose", "uninstall"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["mur", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["mur"]).is_err());
    }
}
