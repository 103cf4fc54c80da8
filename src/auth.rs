//! Credentials for the public registry
//!
//! The registry only needs a bearer token per publish call and, for scoped
//! uninstalls, the user's name. [`CredentialStore`] reads both from the
//! environment or from `~/.murmur/credentials.json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Source of registry credentials
pub trait Authenticator {
    /// Bearer token for the next request
    fn authenticate(&self) -> Result<String>;

    /// Username used to scope artifact names, if known
    fn username(&self) -> Option<String>;
}

pub const TOKEN_ENV: &str = "MURMUR_ACCESS_TOKEN";
pub const USERNAME_ENV: &str = "MURMUR_USERNAME";
pub const CREDENTIALS_ENV: &str = "MUR_CREDENTIALS";

#[derive(Debug, Clone, Default, Deserialize)]
struct StoredCredentials {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// Credentials from the environment, falling back to a JSON file
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    token: Option<String>,
    username: Option<String>,
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// Build a store from `MURMUR_ACCESS_TOKEN`, `MURMUR_USERNAME` and the
    /// credentials file (`MUR_CREDENTIALS` or `~/.murmur/credentials.json`)
    pub fn from_env() -> Self {
        let path = std::env::var_os(CREDENTIALS_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".murmur/credentials.json")));
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self::new(non_empty(TOKEN_ENV), non_empty(USERNAME_ENV), path)
    }

    pub fn new(token: Option<String>, username: Option<String>, path: Option<PathBuf>) -> Self {
        let stored = path.as_deref().map(read_stored).unwrap_or_default();
        Self {
            token: token.or(stored.access_token),
            username: username.or(stored.username),
            path,
        }
    }
}

fn read_stored(path: &Path) -> StoredCredentials {
    let Ok(content) = std::fs::read_to_string(path) else {
        return StoredCredentials::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        debug!("Ignoring unreadable credentials file {}: {e}", path.display());
        StoredCredentials::default()
    })
}

impl Authenticator for CredentialStore {
    fn authenticate(&self) -> Result<String> {
        self.token.clone().ok_or_else(|| {
            let location = self
                .path
                .as_ref()
                .map_or_else(|| "the credentials file".to_string(), |p| p.display().to_string());
            crate::error::api::authentication_required(format!(
                "Set {TOKEN_ENV} or store an access_token in {location}"
            ))
        })
    }

    fn username(&self) -> Option<String> {
        self.username.clone()
    }
}
