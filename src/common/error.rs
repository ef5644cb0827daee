//! Error types for bstarindex.
//!
//! Tree operations never fail: duplicates and missing keys are reported
//! through outcome fields. Errors only come from the record store and the
//! service layer that validates requests.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in bstarindex.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading or writing the record file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record failed request-level validation.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRecord("name is required".into());
        assert_eq!(format!("{}", err), "Invalid record: name is required");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_serialization_error_has_source() {
        use std::error::Error as _;

        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: Error = json_err.into();

        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
