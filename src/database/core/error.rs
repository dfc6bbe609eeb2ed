//! Typed errors for the data-access layer
//!
//! Every store failure is classified into one of a small set of kinds so that
//! callers can tell an empty result apart from a failed query. "Not found" is
//! never an error here: update and delete operations report it as `Ok(false)`.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Error returned by data-access operations
#[derive(Error, Debug)]
pub enum DataError {
    /// The store could not be reached or opened
    #[error("cannot connect to database at '{path}': {reason}")]
    Connectivity { path: String, reason: String },

    /// A uniqueness, foreign-key, check or not-null rule rejected the statement
    #[error("integrity violation: {reason}")]
    Integrity { reason: String },

    /// The statement failed for any other reason (malformed SQL, type mismatch)
    #[error("statement failed: {reason}")]
    Execution { reason: String },

    /// A stored value could not be converted to its Rust type
    #[error("cannot decode column '{column}': {reason}")]
    Decode { column: String, reason: String },
}

impl DataError {
    /// Short machine-friendly name of the error kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DataError::Connectivity { .. } => "connectivity",
            DataError::Integrity { .. } => "integrity",
            DataError::Execution { .. } => "execution",
            DataError::Decode { .. } => "decode",
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, DataError::Connectivity { .. })
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, DataError::Integrity { .. })
    }

    pub(crate) fn integrity(reason: impl Into<String>) -> Self {
        DataError::Integrity {
            reason: reason.into(),
        }
    }

    /// Classify an error raised while opening a connection
    pub(crate) fn connect(path: &str, err: rusqlite::Error) -> Self {
        DataError::Connectivity {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::FromSqlConversionFailure(idx, _, _)
            | rusqlite::Error::InvalidColumnType(idx, _, _)
            | rusqlite::Error::IntegralValueOutOfRange(idx, _) => DataError::Decode {
                column: format!("#{}", idx),
                reason: err.to_string(),
            },
            _ => match err.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => DataError::Integrity {
                    reason: err.to_string(),
                },
                Some(
                    ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::PermissionDenied
                    | ErrorCode::SystemIoFailure,
                ) => DataError::Connectivity {
                    path: String::new(),
                    reason: err.to_string(),
                },
                _ => DataError::Execution {
                    reason: err.to_string(),
                },
            },
        }
    }
}
