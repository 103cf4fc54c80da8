//! Dependency lists from the managed registry's metadata endpoint

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{MurError, Result};

/// Timeout for a metadata lookup
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of an artifact's declared dependencies
pub trait DependencySource {
    /// `requires_dist` entries of `name` on `index_url`
    fn requires_dist(&self, index_url: &str, name: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Default, Deserialize)]
struct PackageMetadata {
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// `<index>/<name with '_' as '-'>/metadata/`
pub fn metadata_url(index_url: &str, name: &str) -> String {
    format!(
        "{}/{}/metadata/",
        index_url.trim_end_matches('/'),
        name.replace('_', "-")
    )
}

fn map_request_error(name: &str, error: reqwest::Error) -> MurError {
    if error.is_connect() {
        crate::error::network::registry_unreachable(name, error)
    } else if error.is_timeout() {
        crate::error::network::timed_out(name, error)
    } else {
        crate::error::network::connection_failed(name, error)
    }
}

/// [`DependencySource`] that queries the registry over HTTP
#[derive(Debug, Clone)]
pub struct HttpDependencySource {
    http: Client,
}

impl HttpDependencySource {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(METADATA_TIMEOUT)
            .build()
            .map_err(|e| crate::error::network::connection_failed("metadata client", e))?;
        Ok(Self { http })
    }
}

impl DependencySource for HttpDependencySource {
    fn requires_dist(&self, index_url: &str, name: &str) -> Result<Vec<String>> {
        let url = metadata_url(index_url, name);
        debug!("Checking metadata for {name} from {url}");

        let metadata: PackageMetadata = self
            .http
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::json)
            .map_err(|e| map_request_error(name, e))?;

        let dependencies = metadata.requires_dist.unwrap_or_default();
        debug!("Dependencies: {dependencies:?}");
        Ok(dependencies)
    }
}
