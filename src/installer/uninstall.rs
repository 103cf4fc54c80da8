//! Artifact removal
//!
//! Names are matched against installed packages after normalization. With a
//! known username the scoped `<username>-<name>` package is removed as well,
//! and the artifact's imports are always cleaned from the aggregation file.

use tracing::{debug, info, warn};

use super::aggregation::ImportAggregation;
use super::tool::{InstalledPackage, PackageTool};
use crate::error::Result;
use crate::manifest::{InstallManifest, normalize_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// Installed package names that were removed
    Removed(Vec<String>),
    NotInstalled,
}

/// Installed package matching `name` after normalization
fn find_installed<'p>(name: &str, installed: &'p [InstalledPackage]) -> Option<&'p str> {
    let wanted = normalize_name(name);
    installed
        .iter()
        .find(|package| normalize_name(&package.name) == wanted)
        .map(|package| package.name.as_str())
}

/// Removes artifacts through a [`PackageTool`]
pub struct Uninstaller<'a> {
    tool: &'a dyn PackageTool,
    username: Option<String>,
    verbose: bool,
}

impl<'a> Uninstaller<'a> {
    pub fn new(tool: &'a dyn PackageTool, username: Option<String>, verbose: bool) -> Self {
        Self {
            tool,
            username: username.filter(|u| !u.trim().is_empty()),
            verbose,
        }
    }

    fn scope_prefixes(&self) -> Vec<String> {
        self.username
            .as_ref()
            .map(|user| ['_', '-', '.'].iter().map(|sep| format!("{user}{sep}")).collect())
            .unwrap_or_default()
    }

    /// `<username>-<name>`, unless `name` already carries the user's scope
    pub fn scoped_name(&self, name: &str) -> Option<String> {
        let user = self.username.as_ref()?;
        if self.scope_prefixes().iter().any(|p| name.starts_with(p.as_str())) {
            return None;
        }
        Some(format!("{user}-{name}"))
    }

    /// `name` with the user's scope prefix removed
    pub fn unscoped_name<'n>(&self, name: &'n str) -> &'n str {
        self.scope_prefixes()
            .iter()
            .find_map(|p| name.strip_prefix(p.as_str()))
            .unwrap_or(name)
    }

    fn remove_installed(&self, name: &str, installed: &[InstalledPackage]) -> Result<Option<String>> {
        let Some(actual) = find_installed(name, installed) else {
            if self.verbose {
                info!("Artifact {name} is not installed");
            }
            return Ok(None);
        };
        if self.verbose {
            info!("Uninstalling {actual}...");
        }
        self.tool.uninstall(actual)?;
        Ok(Some(actual.to_string()))
    }

    /// Uninstall one artifact. A name that is not installed is not an error.
    pub fn uninstall(&self, name: &str) -> Result<UninstallOutcome> {
        let installed = self.tool.list_installed()?;
        debug!("Attempting to uninstall artifact as provided: {name}");

        let mut removed = Vec::new();
        removed.extend(self.remove_installed(name, &installed)?);
        if let Some(scoped) = self.scoped_name(name) {
            debug!("Attempting to uninstall with scope: {scoped}");
            removed.extend(self.remove_installed(&scoped, &installed)?);
        }

        let unscoped = self.unscoped_name(name);
        debug!("Cleaning up imports for {unscoped}");
        let artifacts_dir = self.tool.artifacts_dir()?;
        ImportAggregation::in_dir(&artifacts_dir).remove(unscoped)?;

        Ok(if removed.is_empty() {
            UninstallOutcome::NotInstalled
        } else {
            UninstallOutcome::Removed(removed)
        })
    }

    /// Uninstall every top-level agent, then every top-level tool.
    ///
    /// Failures are logged and do not stop the remaining artifacts.
    pub fn uninstall_manifest(
        &self,
        manifest: &InstallManifest,
    ) -> Vec<(String, Result<UninstallOutcome>)> {
        manifest
            .artifacts()
            .into_iter()
            .map(|artifact| {
                let kind = artifact
                    .kind
                    .map_or_else(|| "artifact".to_string(), |k| k.to_string());
                debug!("Uninstalling {kind}: {}", artifact.name);
                let result = self.uninstall(&artifact.name);
                if let Err(e) = &result {
                    warn!("Failed to uninstall {kind} {}: {e}", artifact.name);
                }
                (artifact.name, result)
            })
            .collect()
    }
}
