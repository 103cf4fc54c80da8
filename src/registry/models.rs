//! Wire models for the registry publish API

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::manifest::{ArtifactKind, ArtifactManifest};

/// Body of `POST /artifacts`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactPublishRequest {
    pub name: String,
    pub version: String,

    #[serde(rename = "type")]
    pub artifact_type: ArtifactKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub metadata: BTreeMap<String, serde_json::Value>,

    pub requires_dist: Vec<String>,
}

impl ArtifactPublishRequest {
    pub fn from_manifest(manifest: &ArtifactManifest) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            artifact_type: manifest.kind,
            description: manifest.description.clone(),
            metadata: manifest.metadata.clone(),
            requires_dist: manifest.dependencies.clone(),
        }
    }
}

/// Successful `POST /artifacts` envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtifactPublishResponse {
    pub name: String,
    pub normalized_name: String,
    pub version: String,
    #[serde(default)]
    pub signed_upload_urls: Vec<SignedUrlInfo>,
}

/// Pre-authorized upload target for one distribution file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlInfo {
    pub file_type: String,
    pub signed_url: String,
    #[serde(default)]
    pub normalized_name: String,
    #[serde(default)]
    pub version: String,
}

impl SignedUrlInfo {
    pub fn dist_kind(&self) -> Option<DistKind> {
        match self.file_type.as_str() {
            "wheel" => Some(DistKind::Wheel),
            "source" | "sdist" => Some(DistKind::Source),
            _ => None,
        }
    }
}

/// Kind of built distribution file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistKind {
    Wheel,
    Source,
}

impl DistKind {
    /// Whether `path` is a distribution file of this kind
    pub fn matches(self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match self {
            DistKind::Wheel => name.ends_with(".whl"),
            DistKind::Source => name.ends_with(".tar.gz") || name.ends_with(".zip"),
        }
    }
}

/// Outcome of a publish call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    /// Registry accepted the release and issued upload targets
    Created,
    /// Upload targets are placeholders; files still have to be pushed
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub status: PublishStatus,
    pub message: Option<String>,
    pub signed_upload_urls: Vec<SignedUrlInfo>,
}
