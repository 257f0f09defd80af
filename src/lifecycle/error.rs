//! Failure kinds of lifecycle operations.

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::enums::RequestStatus;

#[derive(Error, Debug)]
pub enum LifecycleError {
    /// No request with this id.
    #[error("Invalid ID")]
    NotFound { request_id: i64 },

    /// The request exists but is not in the status the operation starts from.
    #[error("Invalid ID or State")]
    NotInState {
        request_id: i64,
        expected: RequestStatus,
    },

    /// A required input field is missing or malformed.
    #[error("constraint violation: {field} {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("A request with same phone number or email is already in progress")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl LifecycleError {
    pub fn missing(field: &'static str) -> Self {
        LifecycleError::Validation {
            field,
            message: "must be provided".into(),
        }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        LifecycleError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Both "no such id" and "wrong state" surface as the same client error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LifecycleError::NotFound { .. } | LifecycleError::NotInState { .. }
        )
    }
}

impl From<rusqlite::Error> for LifecycleError {
    fn from(err: rusqlite::Error) -> Self {
        LifecycleError::Database(DatabaseError::Sqlite(err))
    }
}
