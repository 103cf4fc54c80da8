//! Adapter for the managed public registry
//!
//! Publishing goes through the registry API with a bearer token fetched for
//! every call. Files are then PUT straight to the signed URLs it returns.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use super::models::{
    ArtifactPublishRequest, ArtifactPublishResponse, PublishResult, PublishStatus, SignedUrlInfo,
};
use crate::api::{ApiClient, ContentType};
use crate::auth::Authenticator;
use crate::config::RcLocations;
use crate::config::registry::resolve_public_index_urls;
use crate::error::{MurError, Result};
use crate::manifest::ArtifactManifest;
use crate::progress::TransferProgress;

/// Registry API base URL
pub const DEFAULT_SERVER_URL: &str = "https://api.murmur.nexus";

/// Timeout for a signed URL upload
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

const PUBLISH_ENDPOINT: &str = "/artifacts";

/// Public registry adapter
pub struct PublicRegistry {
    api: ApiClient,
    uploader: Client,
    auth: Box<dyn Authenticator>,
    locations: RcLocations,
    verbose: bool,
}

impl std::fmt::Debug for PublicRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicRegistry")
            .field("server", &self.api.base_url())
            .field("locations", &self.locations)
            .finish_non_exhaustive()
    }
}

impl PublicRegistry {
    pub fn new(
        server_url: &str,
        auth: Box<dyn Authenticator>,
        locations: RcLocations,
        verbose: bool,
    ) -> Result<Self> {
        let api = ApiClient::new(server_url, verbose)?;
        let uploader = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| crate::error::network::upload_failed("Upload failed", Some(e.into())))?;
        Ok(Self {
            api,
            uploader,
            auth,
            locations,
            verbose,
        })
    }

    fn auth_headers(&self) -> Result<Vec<(String, String)>> {
        let token = self.auth.authenticate()?;
        Ok(vec![(
            "Authorization".to_string(),
            format!("Bearer {token}"),
        )])
    }

    /// Register a release and obtain one signed upload target per file
    pub fn publish_artifact(&self, manifest: &ArtifactManifest) -> Result<PublishResult> {
        let payload = ArtifactPublishRequest::from_manifest(manifest);
        if self.verbose {
            debug!(?payload, "Publishing payload");
        }

        let headers = self.auth_headers()?;
        let response = self.api.post::<_, ArtifactPublishResponse>(
            PUBLISH_ENDPOINT,
            &payload,
            &headers,
            &ContentType::Json,
        )?;

        if response.status_code != 200 {
            let message = response.error.unwrap_or_default();
            return Err(map_error_response(response.status_code, &message));
        }

        let data = response.data.ok_or_else(|| {
            crate::error::api::server_error(
                response
                    .error
                    .unwrap_or_else(|| "Empty response from registry".to_string()),
            )
        })?;

        if self.verbose {
            info!(
                "Registry accepted {} {} ({} upload targets)",
                data.normalized_name,
                data.version,
                data.signed_upload_urls.len()
            );
        }

        Ok(PublishResult {
            status: PublishStatus::Created,
            message: None,
            signed_upload_urls: data.signed_upload_urls,
        })
    }

    /// PUT the file bytes to the signed URL
    pub fn upload_file(&self, path: &Path, target: &SignedUrlInfo) -> Result<()> {
        if !path.exists() {
            return Err(crate::error::fs::not_found(path.display()));
        }

        let data = std::fs::read(path).map_err(|e| {
            crate::error::fs::operation_failed(format!("Failed to read {}", path.display()), None, e)
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let progress = TransferProgress::new(&file_name, data.len() as u64);
        progress.advance(data.len() as u64);

        let result = self
            .uploader
            .put(&target.signed_url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                progress.abandon();
                return Err(crate::error::network::upload_failed(
                    format!("Upload failed: {e}"),
                    Some(e.into()),
                ));
            }
        };

        if !response.status().is_success() {
            progress.abandon();
            let text = response.text().unwrap_or_default();
            return Err(crate::error::network::upload_failed(
                format!("Failed to upload file: {text}"),
                None,
            ));
        }

        progress.finish();
        Ok(())
    }

    /// Primary index from the `[global]` section (or the default), then extras
    pub fn get_package_indexes(&self) -> Vec<String> {
        let (primary, extras) = resolve_public_index_urls(&self.locations);
        std::iter::once(primary).chain(extras).collect()
    }
}

/// Map a failed publish response to an error.
///
/// Known server messages win over the status table.
pub fn map_error_response(status: u16, message: &str) -> MurError {
    if message.contains("Token has expired") {
        return MurError::TokenExpired;
    }
    if message.contains("Could not validate credentials") {
        return MurError::InvalidCredentials {
            message: "Could not validate credentials".to_string(),
        };
    }
    if message.contains("already exists") {
        return MurError::VersionExists;
    }

    let default_message = match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Permission denied",
        404 => "Resource not found",
        502 => "Bad gateway",
        503 => "Service unavailable",
        _ => "Server error",
    };
    let message = if message.trim().is_empty() {
        default_message.to_string()
    } else {
        message.to_string()
    };

    match status {
        401 => MurError::InvalidCredentials { message },
        403 => MurError::PermissionDenied { message },
        502 => MurError::RegistryUnreachable {
            message,
            detail: None,
            source: None,
        },
        503 => MurError::ServiceUnavailable {
            message,
            detail: None,
            source: None,
        },
        _ => MurError::ServerError { message },
    }
}
