//! Configuration errors

use std::path::Path;

use super::{BoxError, MurError};

/// Creates a config write failed error
pub fn write_failed(path: &Path, source: impl Into<BoxError>) -> MurError {
    MurError::ConfigWriteFailed {
        path: path.display().to_string(),
        source: Some(source.into()),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: &Path, reason: impl Into<String>) -> MurError {
    MurError::ConfigReadFailed {
        path: path.display().to_string(),
        detail: Some(reason.into()),
    }
}

/// Creates a missing registry configuration error
pub fn missing(message: impl Into<String>, detail: impl Into<String>) -> MurError {
    MurError::ConfigMissing {
        message: message.into(),
        detail: Some(detail.into()),
    }
}

/// Creates an error for a shell completions cannot be generated for
pub fn unsupported_shell(shell: impl Into<String>) -> MurError {
    MurError::UnsupportedShell {
        shell: shell.into(),
    }
}
