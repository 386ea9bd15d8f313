use thiserror::Error;

use crate::actor_framework::StoreError;
use crate::domain::{ObjectId, Role};

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(ObjectId),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("Operation requires role {required}, grant holds {held}")]
    InsufficientGrant { required: Role, held: Role },
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("User database error: {0}")]
    DatabaseError(StoreError),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { key, .. } => UserError::AlreadyExists(key),
            other => UserError::DatabaseError(other),
        }
    }
}
