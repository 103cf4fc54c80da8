//! Registry adapters
//!
//! A command talks to exactly one registry, chosen by [`factory::select_adapter`]:
//! - [`PublicRegistry`]: the managed registry API plus signed URL uploads
//! - [`PrivateRegistry`]: a plain package index fed through twine

pub mod factory;
pub mod models;
pub mod private;
pub mod public;

use std::fmt;
use std::path::Path;

pub use factory::{RegistryOptions, select_adapter};
pub use models::{PublishResult, PublishStatus, SignedUrlInfo};
pub use private::PrivateRegistry;
pub use public::PublicRegistry;

use crate::error::Result;
use crate::manifest::ArtifactManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Public,
    Private,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Public => write!(f, "public"),
            RegistryKind::Private => write!(f, "private"),
        }
    }
}

/// The registry selected for this invocation
#[derive(Debug)]
pub enum RegistryAdapter {
    Public(PublicRegistry),
    Private(PrivateRegistry),
}

impl RegistryAdapter {
    pub fn kind(&self) -> RegistryKind {
        match self {
            RegistryAdapter::Public(_) => RegistryKind::Public,
            RegistryAdapter::Private(_) => RegistryKind::Private,
        }
    }

    /// Register a release and obtain its upload targets
    pub fn publish_artifact(&self, manifest: &ArtifactManifest) -> Result<PublishResult> {
        match self {
            RegistryAdapter::Public(registry) => registry.publish_artifact(manifest),
            RegistryAdapter::Private(registry) => registry.publish_artifact(manifest),
        }
    }

    /// Transfer one built file to a target returned by [`Self::publish_artifact`]
    pub fn upload_file(&self, path: &Path, target: &SignedUrlInfo) -> Result<()> {
        match self {
            RegistryAdapter::Public(registry) => registry.upload_file(path, target),
            RegistryAdapter::Private(registry) => registry.upload_file(path, target),
        }
    }

    /// Primary index first, then extras
    pub fn get_package_indexes(&self) -> Result<Vec<String>> {
        match self {
            RegistryAdapter::Public(registry) => Ok(registry.get_package_indexes()),
            RegistryAdapter::Private(registry) => registry.get_package_indexes(),
        }
    }
}
