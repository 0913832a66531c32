//! Error types for mindgate operations.
//!
//! Storage failures come in two kinds: the store could not be reached at all
//! (`StoreUnavailable`), or the call reached it and failed (`Persistence`).
//! The remaining variants cover configuration, the remote backend, and
//! serialization.

use thiserror::Error;

/// Result type alias for mindgate operations.
pub type MindgateResult<T> = Result<T, MindgateError>;

/// Main error type for all mindgate operations.
#[derive(Error, Debug)]
pub enum MindgateError {
    /// The key-value store or its host context cannot be reached.
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The store was reachable but the operation failed.
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote authentication failed.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote backend request failed.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input rejected before reaching any store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Store (STORE_xxx)
    StoreUnavailable,
    StoreOperationFailed,
    StoreCorruptValue,

    // Authentication (AUTH_xxx)
    AuthRejected,

    // Network (NET_xxx)
    NetConnectionFailed,
    NetBadResponse,

    // Configuration / validation
    Configuration,
    Validation,

    // Serialization
    Serialization,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StoreUnavailable => "STORE_001",
            ErrorCode::StoreOperationFailed => "STORE_002",
            ErrorCode::StoreCorruptValue => "STORE_003",
            ErrorCode::AuthRejected => "AUTH_001",
            ErrorCode::NetConnectionFailed => "NET_001",
            ErrorCode::NetBadResponse => "NET_002",
            ErrorCode::Configuration => "CFG_001",
            ErrorCode::Validation => "VAL_001",
            ErrorCode::Serialization => "SER_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl MindgateError {
    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            code: ErrorCode::StoreOperationFailed,
            source: None,
        }
    }

    /// Create a persistence error for a stored value that could not be decoded.
    pub fn corrupt_value(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            code: ErrorCode::StoreCorruptValue,
            source: None,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthRejected,
            source: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the underlying store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::StoreUnavailable { .. } => ErrorCode::StoreUnavailable,
            Self::Persistence { code, .. } => *code,
            Self::Authentication { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::Configuration,
            Self::Validation(_) => ErrorCode::Validation,
            Self::Serialization(_) => ErrorCode::Serialization,
            Self::Io(_) => ErrorCode::StoreOperationFailed,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Convert from an HTTP status returned by the remote backend.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::authentication(body),
            400..=499 => Self::Network {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::NetBadResponse,
                source: None,
            },
            _ => Self::Network {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::NetConnectionFailed,
                source: None,
            },
        }
    }
}

impl From<rusqlite::Error> for MindgateError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence {
            message: err.to_string(),
            code: ErrorCode::StoreOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable() {
        let err = MindgateError::store_unavailable("context invalidated");
        assert!(err.is_unavailable());
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
        assert!(err.to_string().contains("context invalidated"));
    }

    #[test]
    fn test_rusqlite_maps_to_persistence() {
        let err: MindgateError = rusqlite::Error::InvalidQuery.into();
        assert!(!err.is_unavailable());
        assert_eq!(err.code(), ErrorCode::StoreOperationFailed);
    }

    #[test]
    fn test_from_http_status() {
        let err = MindgateError::from_http_status(401, "Auth session missing");
        assert_eq!(err.code(), ErrorCode::AuthRejected);

        assert!(matches!(err, MindgateError::Authentication { .. }));

        let err = MindgateError::from_http_status(503, "down");
        assert_eq!(err.code(), ErrorCode::NetConnectionFailed);
    }

    #[test]
    fn test_persistence_constructors() {
        let err = MindgateError::persistence("disk full");
        assert!(!err.is_unavailable());
        assert_eq!(err.code(), ErrorCode::StoreOperationFailed);
        assert_eq!(
            MindgateError::corrupt_value("bad").code(),
            ErrorCode::StoreCorruptValue
        );
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::StoreUnavailable.as_str(), "STORE_001");
        assert_eq!(ErrorCode::AuthRejected.as_str(), "AUTH_001");
    }
}
