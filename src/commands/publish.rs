//! Publish command implementation
//!
//! Registers the release described by `murmur-build.yaml` with the selected
//! registry, then uploads the matching built file for every returned target.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use super::CommandContext;
use crate::auth::CredentialStore;
use crate::cli::PublishArgs;
use crate::error::Result;
use crate::manifest::ArtifactManifest;
use crate::registry::models::DistKind;
use crate::registry::{PublishStatus, RegistryAdapter, select_adapter};

/// Run publish command
pub fn run(ctx: &CommandContext, args: PublishArgs) -> Result<()> {
    let manifest = ArtifactManifest::load(&ctx.working_dir)?;
    let dist_dir = match args.dist_dir {
        Some(dir) => ctx.working_dir.join(dir),
        None => default_dist_dir(&ctx.working_dir, &manifest),
    };

    let adapter = select_adapter(&ctx.registry_options(), Box::new(CredentialStore::from_env()))?;
    execute(&adapter, &manifest, &dist_dir)
}

/// `<working dir>/<normalized name>/dist`
pub fn default_dist_dir(working_dir: &Path, manifest: &ArtifactManifest) -> PathBuf {
    working_dir.join(manifest.normalized_name()).join("dist")
}

/// Built files of `kind` directly inside `dist_dir`, sorted by path
pub fn find_dist_files(dist_dir: &Path, kind: DistKind) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dist_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && kind.matches(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Publish `manifest` through `adapter` and upload the files in `dist_dir`
pub fn execute(adapter: &RegistryAdapter, manifest: &ArtifactManifest, dist_dir: &Path) -> Result<()> {
    if !dist_dir.is_dir() {
        return Err(crate::error::fs::not_found(dist_dir.display()));
    }

    let result = adapter.publish_artifact(manifest)?;
    if result.status == PublishStatus::Pending {
        if let Some(message) = &result.message {
            info!("{message}");
        }
    }

    let mut uploaded = 0;
    for target in &result.signed_upload_urls {
        let Some(kind) = target.dist_kind() else {
            warn!("Skipping unknown upload target type '{}'", target.file_type);
            continue;
        };
        let files = find_dist_files(dist_dir, kind);
        if files.is_empty() {
            return Err(crate::error::fs::not_found(format!(
                "{} file in {}",
                target.file_type,
                dist_dir.display()
            )));
        }
        for file in &files {
            adapter.upload_file(file, target)?;
            uploaded += 1;
        }
    }

    super::success(&format!(
        "Successfully published {} {} to the {} registry ({uploaded} file(s))",
        manifest.name,
        manifest.version,
        adapter.kind()
    ));
    Ok(())
}
