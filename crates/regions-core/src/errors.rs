//! Unified error system for Regions
//!
//! Lookup misses are not errors: registry and set lookups return `Option`.
//! This type covers the failures that must reach the immediate caller.

use serde::{Deserialize, Serialize};

/// Unified error type for all Regions operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RegionsError {
    /// Operation attempted on an object that is no longer valid
    #[error("Illegal state: {message}")]
    IllegalState {
        /// Error message describing the state violation
        message: String,
    },

    /// Operation forbidden for this object even though it is valid
    #[error("Not permitted: {message}")]
    NotPermitted {
        /// Error message describing the rejected operation
        message: String,
    },

    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },
}

impl RegionsError {
    /// Create an illegal state error
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// Create a not permitted error
    pub fn not_permitted(message: impl Into<String>) -> Self {
        Self::NotPermitted {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Standard Result type for Regions operations
pub type Result<T> = std::result::Result<T, RegionsError>;

impl From<std::io::Error> for RegionsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RegionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RegionsError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for RegionsError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RegionsError::illegal_state("role is no longer valid");
        assert!(matches!(err, RegionsError::IllegalState { .. }));
        assert_eq!(err.to_string(), "Illegal state: role is no longer valid");

        let err = RegionsError::not_permitted("Cannot delete public role");
        assert_eq!(err.to_string(), "Not permitted: Cannot delete public role");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert!(matches!(
            RegionsError::from(io_err),
            RegionsError::NotFound { .. }
        ));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only");
        assert!(matches!(
            RegionsError::from(io_err),
            RegionsError::Storage { .. }
        ));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            RegionsError::from(json_err),
            RegionsError::Serialization { .. }
        ));
    }

    #[test]
    fn test_error_roundtrips_through_json() {
        let err = RegionsError::not_found("role builder");
        let encoded = serde_json::to_string(&err).unwrap();
        let decoded: RegionsError = serde_json::from_str(&encoded).unwrap();
        assert_eq!(err, decoded);
    }
}
