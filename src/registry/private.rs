//! Adapter for a privately configured package index
//!
//! There is no publish API behind a private index. `publish_artifact` hands
//! back placeholder targets pointing at the repository root and the files are
//! pushed with twine afterwards.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::models::{PublishResult, PublishStatus, SignedUrlInfo};
use crate::config::RcLocations;
use crate::config::registry::resolve_private_index_urls;
use crate::error::Result;
use crate::manifest::ArtifactManifest;

pub const USERNAME_ENV: &str = "PYPI_USERNAME";
pub const PASSWORD_ENV: &str = "PYPI_PASSWORD";

/// Runs `python -m twine upload` against a repository URL
#[derive(Debug, Clone)]
pub struct TwineUploader {
    python: PathBuf,
}

impl TwineUploader {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    fn command(&self, repository_url: &str, path: &Path) -> Command {
        let mut command = Command::new(&self.python);
        command
            .args(["-m", "twine", "upload", "--repository-url", repository_url])
            .args(["--skip-existing", "--non-interactive"])
            .arg(path);
        if let Ok(username) = std::env::var(USERNAME_ENV) {
            command.env("TWINE_USERNAME", username);
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            command.env("TWINE_PASSWORD", password);
        }
        command
    }

    pub fn upload(&self, repository_url: &str, path: &Path) -> Result<()> {
        debug!("Uploading {} to {repository_url}", path.display());
        let output = self.command(repository_url, path).output().map_err(|e| {
            crate::error::network::upload_failed(
                format!("Failed to run twine with {}: {e}", self.python.display()),
                Some(e.into()),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(crate::error::network::upload_failed(
                format!("Failed to upload file: {}", stderr.trim()),
                None,
            ));
        }
        Ok(())
    }
}

/// Private registry adapter
#[derive(Debug, Clone)]
pub struct PrivateRegistry {
    index_url: String,
    locations: RcLocations,
    uploader: TwineUploader,
    verbose: bool,
}

impl PrivateRegistry {
    pub fn new(
        index_url: impl Into<String>,
        locations: RcLocations,
        uploader: TwineUploader,
        verbose: bool,
    ) -> Self {
        Self {
            index_url: index_url.into(),
            locations,
            uploader,
            verbose,
        }
    }

    /// Repository root: the index URL without a trailing `/simple`
    pub fn repository_url(&self) -> String {
        let trimmed = self.index_url.trim_end_matches('/');
        trimmed.strip_suffix("/simple").unwrap_or(trimmed).to_string()
    }

    /// Placeholder wheel and source targets at the repository root
    pub fn publish_artifact(&self, manifest: &ArtifactManifest) -> Result<PublishResult> {
        let repository_url = self.repository_url();
        if self.verbose {
            info!("Using private registry at {repository_url}");
        }

        let signed_upload_urls = ["wheel", "source"]
            .into_iter()
            .map(|file_type| SignedUrlInfo {
                file_type: file_type.to_string(),
                signed_url: repository_url.clone(),
                normalized_name: manifest.normalized_name(),
                version: manifest.version.clone(),
            })
            .collect();

        Ok(PublishResult {
            status: PublishStatus::Pending,
            message: Some("Ready for file upload".to_string()),
            signed_upload_urls,
        })
    }

    pub fn upload_file(&self, path: &Path, target: &SignedUrlInfo) -> Result<()> {
        if !path.exists() {
            return Err(crate::error::fs::not_found(path.display()));
        }
        self.uploader.upload(&target.signed_url, path)?;
        if self.verbose {
            info!("Uploaded {}", path.display());
        }
        Ok(())
    }

    /// Index URLs from the `[murmur-nexus]` section; fails if none is configured
    pub fn get_package_indexes(&self) -> Result<Vec<String>> {
        let (primary, extras) = resolve_private_index_urls(&self.locations)?;
        Ok(std::iter::once(primary).chain(extras).collect())
    }
}
