//! Command implementations for the mur CLI
//!
//! Each command is a thin wrapper: it builds collaborators from the
//! [`CommandContext`] and delegates to the registry and installer modules.

pub mod completions;
pub mod config;
pub mod install;
pub mod publish;
pub mod uninstall;

use std::path::PathBuf;

use console::Style;

use crate::config::RcLocations;
use crate::error::Result;
use crate::registry::RegistryOptions;

/// Overrides the global `.murmurrc` path
pub const GLOBAL_CONFIG_ENV: &str = "MUR_GLOBAL_CONFIG";

/// Per-invocation inputs shared by all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub working_dir: PathBuf,
    pub locations: RcLocations,
    pub verbose: bool,
}

impl CommandContext {
    /// Context for the current directory
    pub fn from_env(verbose: bool) -> Result<Self> {
        let working_dir = std::env::current_dir().map_err(|e| {
            crate::error::fs::operation_failed("Failed to get current directory", None, e)
        })?;
        let global = std::env::var_os(GLOBAL_CONFIG_ENV).map(PathBuf::from);
        Ok(Self::new(working_dir, global, verbose))
    }

    pub fn new(working_dir: PathBuf, global_config: Option<PathBuf>, verbose: bool) -> Self {
        let locations = RcLocations::for_dir(&working_dir, global_config);
        Self {
            working_dir,
            locations,
            verbose,
        }
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions::from_env(self.locations.clone(), self.verbose)
    }
}

pub(crate) fn success(message: &str) {
    println!("{}", Style::new().green().apply_to(message));
}

pub(crate) fn notice(message: &str) {
    println!("{}", Style::new().yellow().apply_to(message));
}

pub(crate) fn warning(message: &str) {
    eprintln!("{} {message}", Style::new().bold().yellow().apply_to("Warning:"));
}
