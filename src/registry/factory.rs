//! Adapter selection
//!
//! The `[murmur-nexus]` `index-url` is the one discriminant: the managed
//! public index selects [`PublicRegistry`], anything else a [`PrivateRegistry`].

use std::path::PathBuf;

use tracing::debug;

use super::RegistryAdapter;
use super::private::{PrivateRegistry, TwineUploader};
use super::public::{DEFAULT_SERVER_URL, PublicRegistry};
use crate::auth::Authenticator;
use crate::config::registry::{DEFAULT_INDEX_URL, PRIVATE_SECTION};
use crate::config::{RcLocations, RegistrySettings};
use crate::error::Result;

pub const SERVER_URL_ENV: &str = "MURMUR_SERVER_URL";
pub const PYTHON_ENV: &str = "MUR_PYTHON";

/// Inputs needed to build an adapter for one command
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub locations: RcLocations,
    pub server_url: String,
    pub python: PathBuf,
    pub verbose: bool,
}

impl RegistryOptions {
    /// Options with the server URL and interpreter taken from the environment
    pub fn from_env(locations: RcLocations, verbose: bool) -> Self {
        Self {
            locations,
            server_url: std::env::var(SERVER_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            python: std::env::var_os(PYTHON_ENV)
                .map_or_else(|| PathBuf::from("python3"), PathBuf::from),
            verbose,
        }
    }
}

/// The configured `index-url`, which must be present and non-empty
fn configured_index_url(locations: &RcLocations) -> Result<String> {
    let settings = RegistrySettings::load(locations, PRIVATE_SECTION)?;
    match settings.index_url().map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        Some(_) => Err(crate::error::config::missing(
            "Registry index-url is empty",
            "Set 'index-url' in .murmurrc [murmur-nexus] section.",
        )),
        None => Err(crate::error::config::missing(
            "No registry index-url configured",
            "Run 'mur config init' or set 'index-url' in .murmurrc [murmur-nexus] section.",
        )),
    }
}

fn is_default_index(url: &str) -> bool {
    url.trim_end_matches('/') == DEFAULT_INDEX_URL.trim_end_matches('/')
}

/// Build the adapter for the current configuration
pub fn select_adapter(
    options: &RegistryOptions,
    auth: Box<dyn Authenticator>,
) -> Result<RegistryAdapter> {
    let index_url = configured_index_url(&options.locations)?;
    if is_default_index(&index_url) {
        debug!("Using public registry at {}", options.server_url);
        let public = PublicRegistry::new(
            &options.server_url,
            auth,
            options.locations.clone(),
            options.verbose,
        )?;
        Ok(RegistryAdapter::Public(public))
    } else {
        debug!("Using private registry at {index_url}");
        Ok(RegistryAdapter::Private(PrivateRegistry::new(
            index_url,
            options.locations.clone(),
            TwineUploader::new(options.python.clone()),
            options.verbose,
        )))
    }
}
