//! Error types for spotdash.
//!
//! Every failure of the API-access layer maps onto one variant of [`Error`]. The
//! two that matter most to callers are [`RefreshFailure`], which ends the current
//! session, and [`ApiError`], which reports a non-success status from the resource
//! API. A "no content" answer is not an error at all; it surfaces as `Ok(None)`.

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the API-access layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Refresh(#[from] RefreshFailure),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Authorization failed: {0}")]
    Authorization(String),
}

impl Error {
    /// True when the session cannot recover and the user has to sign in again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Error::Refresh(_))
    }
}

/// A non-success response from the resource API.
///
/// Also returned for a 401 that persists after one refresh and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Spotify API error: {status} {status_text}")]
pub struct ApiError {
    pub status: u16,
    pub status_text: String,
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// The refresh token could not be exchanged for a new access token.
///
/// `status` is absent when the authorization endpoint was never reached or
/// answered with a body that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to refresh token: {}", describe_refresh(.status, .body))]
pub struct RefreshFailure {
    pub status: Option<u16>,
    pub body: String,
}

fn describe_refresh(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) if body.is_empty() => format!("status {}", code),
        Some(code) => format!("status {}: {}", code, body),
        None => body.to_string(),
    }
}

/// Token persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to load environment file: {0}")]
    Env(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_status() {
        let err = ApiError::from_status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.status, 404);
        assert_eq!(err.status_text, "Not Found");
        assert_eq!(err.to_string(), "Spotify API error: 404 Not Found");
    }

    #[test]
    fn test_refresh_failure_message_carries_upstream_body() {
        let err = RefreshFailure {
            status: Some(400),
            body: r#"{"error":"invalid_grant"}"#.to_string(),
        };
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn test_only_refresh_failure_is_terminal() {
        let refresh: Error = RefreshFailure {
            status: None,
            body: "connection refused".to_string(),
        }
        .into();
        let api: Error = ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED).into();

        assert!(refresh.is_terminal());
        assert!(!api.is_terminal());
    }

    #[test]
    fn test_config_missing_message() {
        let err = ConfigError::Missing("SPOTIFY_CLIENT_ID");
        assert_eq!(err.to_string(), "SPOTIFY_CLIENT_ID must be set");
    }
}
