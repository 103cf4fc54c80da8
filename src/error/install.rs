//! Install and uninstall errors

use super::{BoxError, MurError};

/// Creates an install failed error for an unexpected failure
pub fn failed(name: impl Into<String>, source: impl Into<BoxError>) -> MurError {
    MurError::InstallFailed {
        name: name.into(),
        detail: Some("An unexpected error occurred during artifact installation.".to_string()),
        source: Some(source.into()),
    }
}

/// Creates an installer process failure error
pub fn installer_failed(name: impl Into<String>, stderr: &str) -> MurError {
    MurError::InstallerFailed {
        name: name.into(),
        detail: Some("The artifact installation process failed.".to_string()),
        source: Some(stderr.trim().to_string().into()),
    }
}

/// Creates an uninstall failed error
pub fn uninstall_failed(name: impl Into<String>, reason: impl Into<BoxError>) -> MurError {
    MurError::UninstallFailed {
        name: name.into(),
        detail: None,
        source: Some(reason.into()),
    }
}

/// Creates an error for a failed installed-package listing
pub fn status_check_failed(reason: impl Into<BoxError>) -> MurError {
    MurError::UninstallFailed {
        name: "artifacts".to_string(),
        detail: Some("Failed to check artifact status".to_string()),
        source: Some(reason.into()),
    }
}
