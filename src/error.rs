//! Error types for VitalPath
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::discovery::ValidationErrors;

/// Terminal session failures raised by the authenticated request helper.
///
/// Each variant corresponds to one of the signals the client surfaces when
/// a request cannot be authenticated. Every variant except
/// [`SessionError::AuthenticationRequired`] clears the stored tokens before
/// it is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No access token is stored at all.
    #[error("You are not signed in")]
    AuthenticationRequired,

    /// The server rejected the access token and no refresh token is stored.
    #[error("Your session has expired")]
    SessionExpired,

    /// The refresh endpoint rejected the refresh token as expired or invalid.
    #[error("Your session has expired and could not be renewed")]
    RefreshExpired,

    /// The refresh endpoint failed for any other reason.
    #[error("Your session could not be renewed")]
    RefreshFailed,
}

impl SessionError {
    /// Stable machine-readable code for the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitalpath::error::SessionError;
    ///
    /// assert_eq!(SessionError::SessionExpired.code(), "SESSION_EXPIRED");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::RefreshExpired => "REFRESH_EXPIRED",
            Self::RefreshFailed => "REFRESH_FAILED",
        }
    }
}

/// Main error type for VitalPath operations
#[derive(Error, Debug)]
pub enum VitalPathError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failures from the request helper
    #[error("{0}")]
    Session(#[from] SessionError),

    /// The API answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The API answered with a body the client could not understand
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Form fields failed local validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Token persistence errors
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Discovery draft persistence errors
    #[error("Draft error: {0}")]
    Draft(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL construction errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl VitalPathError {
    /// Returns the session failure carried by `err`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitalpath::error::{SessionError, VitalPathError};
    ///
    /// let err: anyhow::Error = VitalPathError::Session(SessionError::RefreshExpired).into();
    /// assert_eq!(VitalPathError::session_kind(&err), Some(SessionError::RefreshExpired));
    /// ```
    pub fn session_kind(err: &anyhow::Error) -> Option<SessionError> {
        match err.downcast_ref::<VitalPathError>() {
            Some(VitalPathError::Session(kind)) => Some(*kind),
            _ => err.downcast_ref::<SessionError>().copied(),
        }
    }

    /// Returns the HTTP status of an [`VitalPathError::Api`] failure, if any.
    pub fn api_status(err: &anyhow::Error) -> Option<u16> {
        match err.downcast_ref::<VitalPathError>() {
            Some(VitalPathError::Api { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for VitalPath operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
