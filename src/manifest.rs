//! Artifact manifests
//!
//! - `murmur.yaml` lists the agents and tools a project installs, with tools
//!   nested under the agents that use them.
//! - `murmur-build.yaml` describes one artifact being built and published.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Install manifest file name
pub const INSTALL_MANIFEST: &str = "murmur.yaml";

/// Build manifest file name
pub const BUILD_MANIFEST: &str = "murmur-build.yaml";

/// Version placeholder meaning "whatever the index offers"
pub const LATEST: &str = "latest";

/// Normalize an artifact name: lowercase, with `-` and `.` turned into `_`.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['-', '.'], "_")
}

/// Whether `version` asks for no particular version
pub fn is_latest(version: &str) -> bool {
    version.is_empty() || version.eq_ignore_ascii_case(LATEST)
}

/// Kind of artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Agent,
    Tool,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Agent => write!(f, "agent"),
            ArtifactKind::Tool => write!(f, "tool"),
        }
    }
}

fn default_version() -> String {
    LATEST.to_string()
}

/// A node of the install tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(skip)]
    pub kind: Option<ArtifactKind>,

    /// Tools this artifact uses, installed after it in manifest order
    #[serde(default)]
    pub tools: Vec<Artifact>,
}

impl Artifact {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind: Some(kind),
            tools: Vec::new(),
        }
    }

    /// Artifact of unknown kind at the latest version
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: LATEST.to_string(),
            kind: None,
            tools: Vec::new(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Artifact>) -> Self {
        self.tools = tools;
        self
    }

    /// Installer requirement for this artifact
    pub fn spec(&self) -> String {
        if is_latest(&self.version) {
            self.name.clone()
        } else {
            format!("{}=={}", self.name, self.version)
        }
    }

    fn mark_kind(&mut self, kind: ArtifactKind) {
        self.kind = Some(kind);
        for tool in &mut self.tools {
            tool.mark_kind(ArtifactKind::Tool);
        }
    }
}

/// Contents of `murmur.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstallManifest {
    #[serde(default)]
    pub agents: Vec<Artifact>,

    #[serde(default)]
    pub tools: Vec<Artifact>,
}

impl InstallManifest {
    /// Parse manifest YAML, tagging every node with its kind
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let mut manifest: Self = serde_yaml::from_str(yaml)?;
        for agent in &mut manifest.agents {
            agent.mark_kind(ArtifactKind::Agent);
        }
        for tool in &mut manifest.tools {
            tool.mark_kind(ArtifactKind::Tool);
        }
        Ok(manifest)
    }

    /// Load `murmur.yaml` from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INSTALL_MANIFEST);
        let content = read_manifest(&path)?;
        Self::from_yaml(&content).map_err(|e| {
            crate::error::fs::manifest_invalid(format!("Failed to load {INSTALL_MANIFEST}"), e.to_string())
        })
    }

    /// Top-level artifacts: agents first, then tools
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.agents.iter().chain(&self.tools).cloned().collect()
    }
}

/// Contents of `murmur-build.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub version: String,

    #[serde(rename = "type")]
    pub kind: ArtifactKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ArtifactManifest {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            crate::error::fs::manifest_invalid(
                format!("Failed to load {BUILD_MANIFEST}"),
                format!("{e}. The artifact type must be either 'agent' or 'tool'."),
            )
        })
    }

    /// Load `murmur-build.yaml` from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        Self::from_yaml(&read_manifest(&dir.join(BUILD_MANIFEST))?)
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

fn read_manifest(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(crate::error::fs::not_found(path.display()));
    }
    std::fs::read_to_string(path).map_err(|e| {
        crate::error::fs::operation_failed(
            format!("Failed to read {}", path.display()),
            None,
            e,
        )
    })
}
