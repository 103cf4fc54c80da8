//! Registry settings read from the local and global `.murmurrc` files
//!
//! The local file in the working directory wins over the global one, key by
//! key. Nothing here writes to disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::rc_file::RcFile;
use crate::error::Result;

/// Index URL of the managed public registry
pub const DEFAULT_INDEX_URL: &str = "https://artifacts.murmur.nexus/simple";

/// Extra index written by `mur config init`
pub const DEFAULT_EXTRA_INDEX_URL: &str = "https://pypi.org/simple";

/// Section read by the adapter factory and the private registry
pub const PRIVATE_SECTION: &str = "murmur-nexus";

/// Section read by the public registry
pub const PUBLIC_SECTION: &str = "global";

pub const INDEX_URL_KEY: &str = "index-url";
pub const EXTRA_INDEX_URL_KEY: &str = "extra-index-url";

const RC_FILE_NAME: &str = ".murmurrc";

/// Paths of the two configuration scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcLocations {
    pub local: PathBuf,
    pub global: PathBuf,
}

impl RcLocations {
    pub fn new(local: impl Into<PathBuf>, global: impl Into<PathBuf>) -> Self {
        Self {
            local: local.into(),
            global: global.into(),
        }
    }

    /// Locations for `working_dir`, with the global file in the home directory
    /// unless `global_override` is given
    pub fn for_dir(working_dir: &Path, global_override: Option<PathBuf>) -> Self {
        let global = global_override.unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(RC_FILE_NAME)
        });
        Self::new(working_dir.join(RC_FILE_NAME), global)
    }
}

/// Key-value view of one section merged across both scopes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySettings {
    local: Option<RcFile>,
    global: Option<RcFile>,
    section: String,
}

impl RegistrySettings {
    /// Read `section` from both scopes without creating either file
    pub fn load(locations: &RcLocations, section: &str) -> Result<Self> {
        let read = |path: &Path| -> Result<Option<RcFile>> {
            if path.exists() {
                RcFile::load(path).map(Some)
            } else {
                Ok(None)
            }
        };
        let local = read(&locations.local)?;
        let global = read(&locations.global)?;
        debug!(
            local = %locations.local.display(),
            global = %locations.global.display(),
            has_local = local.is_some(),
            has_global = global.is_some(),
            "loaded registry settings"
        );
        Ok(Self {
            local,
            global,
            section: section.to_string(),
        })
    }

    /// Value for `key`, local scope first
    pub fn get(&self, key: &str) -> Option<&str> {
        let section = self.section.as_str();
        self.local
            .as_ref()
            .and_then(|file| file.get(section, key))
            .or_else(|| self.global.as_ref().and_then(|file| file.get(section, key)))
    }

    pub fn index_url(&self) -> Option<&str> {
        self.get(INDEX_URL_KEY)
    }

    /// Extra index URLs in file order, blank entries dropped
    pub fn extra_index_urls(&self) -> Vec<String> {
        self.get(EXTRA_INDEX_URL_KEY)
            .map(split_url_list)
            .unwrap_or_default()
    }
}

/// Split a newline-delimited URL list, trimming entries and dropping blanks
pub fn split_url_list(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `(primary, extras)` for the public registry.
///
/// A missing `index-url` falls back to [`DEFAULT_INDEX_URL`], and an unreadable
/// configuration degrades to the default index alone.
pub fn resolve_public_index_urls(locations: &RcLocations) -> (String, Vec<String>) {
    match RegistrySettings::load(locations, PUBLIC_SECTION) {
        Ok(settings) => {
            let primary = settings
                .index_url()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_INDEX_URL)
                .to_string();
            (primary, settings.extra_index_urls())
        }
        Err(e) => {
            tracing::warn!("Failed to read .murmurrc config: {e}");
            (DEFAULT_INDEX_URL.to_string(), Vec::new())
        }
    }
}

/// Resolve `(primary, extras)` for a private registry.
///
/// A missing or empty `index-url` is a configuration error.
pub fn resolve_private_index_urls(locations: &RcLocations) -> Result<(String, Vec<String>)> {
    let settings = RegistrySettings::load(locations, PRIVATE_SECTION)?;
    let primary = settings
        .index_url()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            crate::error::config::missing(
                "No private registry URL configured",
                "Set 'index-url' in .murmurrc [murmur-nexus] section.",
            )
        })?;
    Ok((primary.to_string(), settings.extra_index_urls()))
}
