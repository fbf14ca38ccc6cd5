//! Error types for Bukber

use thiserror::Error;

/// Main error type for Bukber operations
#[derive(Error, Debug)]
pub enum BukberError {
    /// The bulk fetch collaborator could not return recent entries
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The realtime stream could not be established
    #[error("Subscribe failed: {0}")]
    SubscribeFailed(String),

    /// The write collaborator rejected a submission
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Local pre-submission validation failed
    #[error("Validation failed: {field}: {reason}")]
    ValidationFailed {
        /// Form field that failed validation
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// An entry payload is missing required fields (e.g. its id)
    #[error("Malformed entry: {0}")]
    MalformedEntry(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BukberError {
    /// Shorthand for a [`BukberError::ValidationFailed`]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        BukberError::ValidationFailed {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias using BukberError
pub type BukberResult<T> = Result<T, BukberError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BukberError::FetchFailed("connection reset".to_string());
        assert_eq!(format!("{}", err), "Fetch failed: connection reset");
    }

    #[test]
    fn test_validation_display() {
        let err = BukberError::validation("name", "must not be empty");
        assert_eq!(format!("{}", err), "Validation failed: name: must not be empty");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BukberError = io_err.into();
        assert!(matches!(err, BukberError::Io(_)));
    }
}
