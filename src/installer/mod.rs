//! Artifact installation and removal
//!
//! This module handles:
//! - Driving the package installer ([`tool`])
//! - Fetching declared dependencies from the registry ([`metadata`])
//! - Maintaining the generated import file ([`aggregation`])
//! - Depth-first install of manifest trees ([`install`])
//! - Scoped, normalized uninstall ([`uninstall`])

pub mod aggregation;
pub mod install;
pub mod metadata;
pub mod tool;
pub mod uninstall;

pub use install::{ArtifactInstaller, InstallOutcome, NodeReport, NodeStatus};
pub use metadata::HttpDependencySource;
pub use tool::PipTool;
pub use uninstall::{UninstallOutcome, Uninstaller};
