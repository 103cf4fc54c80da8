//! Connectivity errors

use super::{BoxError, MurError};

const REGISTRY_CONNECT_DETAIL: &str = "Could not establish connection to the artifact registry. \
     Please check your network connection and registry URL.";

/// Creates an upload failed error
pub fn upload_failed(message: impl Into<String>, source: Option<BoxError>) -> MurError {
    MurError::UploadFailed {
        message: message.into(),
        source,
    }
}

/// Creates an unreachable registry error for an artifact
pub fn registry_unreachable(name: &str, source: impl Into<BoxError>) -> MurError {
    MurError::RegistryUnreachable {
        message: format!("Failed to connect to artifact registry for {name}"),
        detail: Some(REGISTRY_CONNECT_DETAIL.to_string()),
        source: Some(source.into()),
    }
}

/// Creates a timeout error for an artifact metadata lookup
pub fn timed_out(name: &str, source: impl Into<BoxError>) -> MurError {
    MurError::ServiceUnavailable {
        message: format!("Connection timed out while fetching metadata for {name}"),
        detail: Some(
            "The request to the artifact registry timed out. Please try again or check your network connection."
                .to_string(),
        ),
        source: Some(source.into()),
    }
}

/// Creates a connection error for an artifact metadata lookup
pub fn connection_failed(name: &str, source: impl Into<BoxError>) -> MurError {
    MurError::ConnectionFailed {
        message: format!("Failed to fetch metadata for {name}"),
        detail: Some(
            "Encountered an error while communicating with the artifact registry.".to_string(),
        ),
        source: Some(source.into()),
    }
}
