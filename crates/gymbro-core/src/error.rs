//! Error types for the GYMBRO session engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire GYMBRO workspace.
///
/// Variants map onto the taxonomy the transport layer understands
/// (see [`ErrorKind`]); store-specific failures are folded into
/// `StoreUnavailable` so callers never depend on a concrete backend.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GymError {
    /// Malformed input to a mutation. Holds one message per failing field.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The user already owns an active session.
    #[error("User '{user_id}' already has an active workout")]
    AlreadyActive { user_id: String },

    /// The user has no session to act on.
    #[error("User '{user_id}' has no active workout")]
    NoActiveSession { user_id: String },

    /// The caller does not own the requested entity.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A conditional write lost against a concurrent writer.
    #[error("Concurrent modification of {entity_type} '{id}'")]
    Conflict {
        entity_type: &'static str,
        id: String,
    },

    /// Underlying store I/O failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`GymError`] used by transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyActive,
    NoActiveSession,
    Forbidden,
    StoreUnavailable,
    Internal,
}

impl ErrorKind {
    /// HTTP status code a transport should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::AlreadyActive => 409,
            Self::NoActiveSession | Self::Forbidden => 403,
            Self::StoreUnavailable => 503,
            Self::Internal => 500,
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyActive => "ACTIVE_WORKOUT",
            Self::NoActiveSession => "NO_ACTIVE_WORKOUT",
            Self::Forbidden => "FORBIDDEN",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// True when the caller can fix the request (4xx class).
    pub fn is_client_error(self) -> bool {
        self.http_status() < 500
    }
}

impl GymError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error from a single message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an AlreadyActive error
    pub fn already_active(user_id: impl Into<String>) -> Self {
        Self::AlreadyActive {
            user_id: user_id.into(),
        }
    }

    /// Creates a NoActiveSession error
    pub fn no_active_session(user_id: impl Into<String>) -> Self {
        Self::NoActiveSession {
            user_id: user_id.into(),
        }
    }

    /// Creates a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates a Conflict error
    pub fn conflict(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Classifies this error for the transport layer.
    ///
    /// `Conflict` only escapes the engine once retries are exhausted, at which
    /// point it means "try again later". `Config` is a startup failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyActive { .. } => ErrorKind::AlreadyActive,
            Self::NoActiveSession { .. } => ErrorKind::NoActiveSession,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict { .. } | Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::Config(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GymError {
    fn from(err: std::io::Error) -> Self {
        Self::StoreUnavailable(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for GymError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON: {}", err))
    }
}

impl From<toml::de::Error> for GymError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML: {}", err))
    }
}

/// A type alias for `Result<T, GymError>`.
pub type Result<T> = std::result::Result<T, GymError>;
