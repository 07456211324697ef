//! Error type for poll store and pipeline operations
//!
//! Transport, storage and defect conditions share one enum. Vote rejections
//! are user-facing outcomes rather than failures and live in
//! [`crate::validation::Rejection`].

use serde::{Deserialize, Serialize};

/// Unified error type for poll operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PollError {
    /// The store could not be reached for a read or write
    #[error("Network unreachable: {message}")]
    NetworkUnreachable {
        /// Error message describing the transport failure
        message: String,
    },

    /// The store was reached but refused or failed the operation
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// A selected item is missing from the snapshot it was validated against
    #[error("Item not found in snapshot: {name}")]
    ItemNotFound {
        /// Name of the missing item
        name: String,
    },
}

impl PollError {
    /// Create a network unreachable error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an item not found error
    pub fn item_not_found(name: impl Into<String>) -> Self {
        Self::ItemNotFound { name: name.into() }
    }

    /// Whether this error signals a broken invariant rather than a runtime failure.
    ///
    /// Defects are reported as bugs and never shown to the user verbatim.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }
}

/// Standard Result type for poll operations
pub type PollResult<T> = std::result::Result<T, PollError>;

impl From<serde_json::Error> for PollError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for PollError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::TimedOut => Self::unreachable(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PollError::unreachable("offline");
        assert!(matches!(err, PollError::NetworkUnreachable { .. }));
        assert_eq!(err.to_string(), "Network unreachable: offline");
    }

    #[test]
    fn test_only_item_not_found_is_defect() {
        assert!(PollError::item_not_found("A").is_defect());
        assert!(!PollError::storage("disk full").is_defect());
        assert!(!PollError::unreachable("offline").is_defect());
    }

    #[test]
    fn test_io_error_conversion() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            PollError::from(refused),
            PollError::NetworkUnreachable { .. }
        ));

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no file");
        assert!(matches!(PollError::from(missing), PollError::Storage { .. }));
    }
}
