//! File system errors

use super::{BoxError, MurError};

/// Creates a file not found error
pub fn not_found(path: impl std::fmt::Display) -> MurError {
    MurError::FileNotFound {
        path: path.to_string(),
    }
}

/// Creates a generic file operation error wrapping its cause
pub fn operation_failed(
    message: impl Into<String>,
    detail: Option<String>,
    source: impl Into<BoxError>,
) -> MurError {
    MurError::FileOperationFailed {
        message: message.into(),
        detail,
        source: Some(source.into()),
    }
}

/// Creates an invalid manifest error
pub fn manifest_invalid(message: impl Into<String>, detail: impl Into<String>) -> MurError {
    MurError::ManifestInvalid {
        message: message.into(),
        detail: Some(detail.into()),
    }
}
