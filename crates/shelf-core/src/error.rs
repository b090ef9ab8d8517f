//! Operation errors
//!
//! Every store operation fails with one of these kinds. Storage failures
//! are converted at the operation boundary: uniqueness violations become
//! `ConstraintViolation`, everything else `StorageUnavailable`.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by store operations
#[derive(Error, Debug)]
pub enum Error {
    /// The storage engine cannot be opened or used; fatal for the session
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),

    /// A uniqueness rule was violated (duplicate category name)
    #[error("{0}")]
    ConstraintViolation(String),

    /// A required field is missing or invalid; nothing was written
    #[error("{0}")]
    Validation(String),

    /// An import file could not be parsed; nothing was changed
    #[error("Malformed import: {0}")]
    MalformedImport(String),

    /// The edit target no longer exists
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
}

impl From<StorageError> for Error {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Constraint(reason) => Error::ConstraintViolation(reason),
            other => Error::StorageUnavailable(other),
        }
    }
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn category_not_found(id: i64) -> Self {
        Error::NotFound {
            kind: "Category",
            id,
        }
    }

    pub(crate) fn bookmark_not_found(id: i64) -> Self {
        Error::NotFound {
            kind: "Bookmark",
            id,
        }
    }

    /// Whether the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::StorageUnavailable(_))
    }

    /// Whether this is a vanished edit/delete target, to be treated as a no-op
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Error::StorageUnavailable(e) => e.recovery_suggestion(),
            Error::ConstraintViolation(_) => Some("Choose a different, unique name."),
            Error::MalformedImport(_) => {
                Some("Check that the file is a JSON export with 'categories' and 'bookmarks' arrays.")
            }
            _ => None,
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_maps_to_violation() {
        let err = Error::from(StorageError::Constraint("UNIQUE failed".to_string()));
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_other_storage_errors_are_unavailable() {
        let err = Error::from(StorageError::Worker("cancelled".to_string()));
        assert!(matches!(err, Error::StorageUnavailable(_)));
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_export_encoding_failure_is_unavailable() {
        let source = serde_json::from_str::<i64>("not a number").unwrap_err();
        let err = Error::from(StorageError::Encode(source));
        assert!(matches!(
            err,
            Error::StorageUnavailable(StorageError::Encode(_))
        ));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::bookmark_not_found(12);
        assert_eq!(err.to_string(), "Bookmark 12 not found");
        assert!(err.is_not_found());
        assert!(err.is_recoverable());
    }
}
