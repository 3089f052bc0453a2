//! Error types for TeamFinder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire TeamFinder workspace.
///
/// Validation errors are raised locally before any gateway call; gateway
/// errors carry the backend's message verbatim so it can be shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TeamfinderError {
    /// Local input validation failed; no network call was made.
    #[error("{0}")]
    Validation(String),

    /// The remote gateway rejected the request or could not be reached.
    #[error("{message}")]
    Gateway {
        /// HTTP status code when the failure came from a response.
        status: Option<u16>,
        message: String,
    },

    /// A single-row read found nothing.
    #[error("Record not found: {table} '{id}'")]
    NotFound { table: String, id: String },

    /// The operation needs a signed-in identity.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The operation is not available in the current session state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(String),
}

impl TeamfinderError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Gateway error without an HTTP status
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Gateway error carrying the response status
    pub fn gateway_status(status: u16, message: impl Into<String>) -> Self {
        Self::Gateway {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a local validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the gateway (including not-found reads)
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. } | Self::NotFound { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Gateway { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TeamfinderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for TeamfinderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TeamfinderError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TeamfinderError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TeamfinderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Gateway {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for TeamfinderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Gateway {
            status: None,
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TeamfinderError>`.
pub type Result<T> = std::result::Result<T, TeamfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = TeamfinderError::validation("Username is required");
        assert_eq!(err.to_string(), "Username is required");
        assert_eq!(err.user_message(), "Username is required");
        assert!(err.is_validation());
        assert!(!err.is_gateway());
    }

    #[test]
    fn test_gateway_message_is_verbatim() {
        let err = TeamfinderError::gateway_status(400, "Invalid login credentials");
        assert_eq!(err.user_message(), "Invalid login credentials");
        assert!(err.is_gateway());
    }

    #[test]
    fn test_not_found_counts_as_gateway() {
        let err = TeamfinderError::not_found("profiles", "abc");
        assert!(err.is_not_found());
        assert!(err.is_gateway());
        assert_eq!(err.to_string(), "Record not found: profiles 'abc'");
    }

    #[test]
    fn test_from_json_error() {
        let err: TeamfinderError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, TeamfinderError::Serialization { ref format, .. } if format == "JSON"));
    }
}
