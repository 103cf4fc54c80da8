//! API, authentication and server errors

use super::{BoxError, MurError};

/// Creates an API request failed error
pub fn request_failed(endpoint: impl Into<String>, source: impl Into<BoxError>) -> MurError {
    MurError::ApiRequestFailed {
        endpoint: endpoint.into(),
        source: Some(source.into()),
    }
}

/// Creates an authentication required error
pub fn authentication_required(detail: impl Into<String>) -> MurError {
    MurError::AuthenticationRequired {
        detail: Some(detail.into()),
    }
}

/// Creates a generic server error
pub fn server_error(message: impl Into<String>) -> MurError {
    MurError::ServerError {
        message: message.into(),
    }
}
