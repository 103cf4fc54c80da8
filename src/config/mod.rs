//! Configuration file handling for mur
//!
//! This module contains:
//! - [`rc_file`]: the `.murmurrc` INI document model
//! - [`registry`]: registry settings merged from the local and global scopes

pub mod rc_file;
pub mod registry;

pub use rc_file::RcFile;
pub use registry::{RcLocations, RegistrySettings};
