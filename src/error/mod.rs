//! Error types and handling for mur
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every failure surfaces as a [`MurError`]. Each variant belongs to one band
//! of the numeric taxonomy reported by [`MurError::code`]:
//! - 2xx: local file and filesystem problems ([`fs`])
//! - 3xx: install and uninstall process failures ([`install`])
//! - 4xx: configuration read/write failures ([`config`])
//! - 5xx: API and authentication failures ([`api`])
//! - 6xx: generic server-side HTTP mapping ([`api`])
//! - 8xx: connectivity: DNS, refused connections, timeouts, bad gateways ([`network`])
//!
//! Lower-level failures (reqwest, serde, subprocess, io) are wrapped at the
//! boundary of the component that produced them and kept as the error source.
//! A `MurError` is never re-wrapped.

pub mod api;
pub mod config;
pub mod fs;
pub mod install;
pub mod network;


use miette::Diagnostic;
use thiserror::Error;

/// Boxed lower-level cause attached to a [`MurError`] for diagnostics
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for mur operations
#[derive(Error, Diagnostic, Debug)]
pub enum MurError {
    // File system errors
    #[error("{message}")]
    #[diagnostic(code(mur::fs::operation_failed))]
    FileOperationFailed {
        message: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("File not found: {path}")]
    #[diagnostic(code(mur::fs::not_found))]
    FileNotFound { path: String },

    #[error("{message}")]
    #[diagnostic(code(mur::fs::manifest_invalid))]
    ManifestInvalid {
        message: String,
        #[help]
        detail: Option<String>,
    },

    // Install errors
    #[error("Failed to install {name}")]
    #[diagnostic(code(mur::install::failed))]
    InstallFailed {
        name: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Package with version already exists")]
    #[diagnostic(
        code(mur::install::version_exists),
        help("Bump the version in murmur-build.yaml before publishing again")
    )]
    VersionExists,

    #[error("Failed to install {name}")]
    #[diagnostic(code(mur::install::process_failed))]
    InstallerFailed {
        name: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("The '{package}' package is not installed")]
    #[diagnostic(
        code(mur::install::runtime_missing),
        help("Install the murmur package before installing your agent or tool")
    )]
    RuntimeMissing { package: String },

    #[error("Failed to uninstall {name}")]
    #[diagnostic(code(mur::install::uninstall_failed))]
    UninstallFailed {
        name: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    // Configuration errors
    #[error("Failed to write configuration file: {path}")]
    #[diagnostic(code(mur::config::write_failed))]
    ConfigWriteFailed {
        path: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(mur::config::read_failed))]
    ConfigReadFailed {
        path: String,
        #[help]
        detail: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(mur::config::missing))]
    ConfigMissing {
        message: String,
        #[help]
        detail: Option<String>,
    },

    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(mur::config::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },

    // API and authentication errors
    #[error("Authentication required")]
    #[diagnostic(code(mur::api::authentication_required))]
    AuthenticationRequired {
        #[help]
        detail: Option<String>,
    },

    #[error("API request to {endpoint} failed")]
    #[diagnostic(
        code(mur::api::request_failed),
        help("Failed to communicate with server")
    )]
    ApiRequestFailed {
        endpoint: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    #[diagnostic(code(mur::api::invalid_credentials))]
    InvalidCredentials { message: String },

    #[error("Token has expired. Please log in again")]
    #[diagnostic(
        code(mur::api::token_expired),
        help("Refresh the access token in MURMUR_ACCESS_TOKEN or the credentials file and try again")
    )]
    TokenExpired,

    #[error("{message}")]
    #[diagnostic(code(mur::api::permission_denied))]
    PermissionDenied { message: String },

    // Server errors
    #[error("{message}")]
    #[diagnostic(code(mur::server::error))]
    ServerError { message: String },

    // Connectivity errors
    #[error("{message}")]
    #[diagnostic(code(mur::network::upload_failed))]
    UploadFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    #[diagnostic(code(mur::network::connection_failed))]
    ConnectionFailed {
        message: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    #[diagnostic(code(mur::network::unavailable))]
    ServiceUnavailable {
        message: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    #[diagnostic(code(mur::network::unreachable))]
    RegistryUnreachable {
        message: String,
        #[help]
        detail: Option<String>,
        #[source]
        source: Option<BoxError>,
    },
}

impl MurError {
    /// Numeric taxonomy code for this error
    pub fn code(&self) -> u16 {
        match self {
            MurError::FileOperationFailed { .. } => 200,
            MurError::FileNotFound { .. } => 201,
            MurError::ManifestInvalid { .. } => 205,
            MurError::InstallFailed { .. } => 300,
            MurError::VersionExists => 302,
            MurError::InstallerFailed { .. } => 307,
            MurError::RuntimeMissing { .. } => 308,
            MurError::UninstallFailed { .. } => 309,
            MurError::UnsupportedShell { .. } => 400,
            MurError::ConfigWriteFailed { .. } => 401,
            MurError::ConfigReadFailed { .. } => 402,
            MurError::ConfigMissing { .. } => 403,
            MurError::AuthenticationRequired { .. } => 500,
            MurError::ApiRequestFailed { .. } => 501,
            MurError::InvalidCredentials { .. } => 502,
            MurError::TokenExpired => 504,
            MurError::PermissionDenied { .. } => 505,
            MurError::ServerError { .. } => 600,
            MurError::UploadFailed { .. } => 800,
            MurError::ConnectionFailed { .. } => 803,
            MurError::ServiceUnavailable { .. } => 804,
            MurError::RegistryUnreachable { .. } => 806,
        }
    }

    /// Additional detail for the user, if any
    pub fn detail(&self) -> Option<String> {
        self.help().map(|help| help.to_string())
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, MurError>;
