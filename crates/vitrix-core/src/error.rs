//! Unified application error types for Vitrix.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Per-token push failures are not
//! errors at this level; they are recorded as dispatch outcomes.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Caller input was rejected (missing fields, bad target, missing identity).
    Validation,
    /// A valid target resolved to zero deliverable recipients.
    NoRecipients,
    /// The requested resource was not found.
    NotFound,
    /// The push gateway has no credential configured.
    GatewayUnconfigured,
    /// A concurrent modification could not be resolved.
    Conflict,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external service error occurred.
    ExternalService,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NoRecipients => "NO_RECIPIENTS",
            Self::NotFound => "NOT_FOUND",
            Self::GatewayUnconfigured => "GATEWAY_UNCONFIGURED",
            Self::Conflict => "CONFLICT",
            Self::Database => "DATABASE_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::ExternalService => "EXTERNAL_SERVICE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Whether this kind is caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation | Self::NoRecipients | Self::NotFound | Self::Conflict
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout Vitrix.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Title or body missing from a notification request.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::validation(format!("Missing required fields: {}", fields.join(", ")))
    }

    /// Neither an individual identity nor a group/"all" selector was supplied.
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::validation(message)
    }

    /// Neither email nor user id was supplied for a receipt update.
    pub fn missing_identity() -> Self {
        Self::validation("Either email or userId is required")
    }

    /// The target resolved to nobody who can receive a push.
    pub fn no_recipients(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoRecipients, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// The message addressed by a receipt update does not exist.
    pub fn message_not_found(message_id: impl fmt::Display) -> Self {
        Self::not_found(format!("Message '{message_id}' not found"))
    }

    /// The push gateway credential is missing.
    pub fn gateway_unconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::GatewayUnconfigured, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external service error.
    pub fn external(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_code() {
        let err = AppError::missing_fields(&["title", "body"]);
        assert_eq!(
            err.to_string(),
            "VALIDATION_ERROR: Missing required fields: title, body"
        );
    }

    #[test]
    fn client_error_classification() {
        assert!(ErrorKind::NoRecipients.is_client_error());
        assert!(ErrorKind::NotFound.is_client_error());
        assert!(!ErrorKind::GatewayUnconfigured.is_client_error());
        assert!(!ErrorKind::Database.is_client_error());
    }

    #[test]
    fn clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Database, "write failed", io);
        assert!(std::error::Error::source(&err).is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Database);
        assert!(cloned.source.is_none());
    }
}
