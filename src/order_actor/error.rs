use thiserror::Error;

use crate::actor_framework::StoreError;
use crate::domain::{ObjectId, OrderStatus};

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(ObjectId),
    #[error("No further status transition available from {}", describe(.0))]
    TransitionUnavailable(Option<OrderStatus>),
    #[error("Order already advanced past {0}")]
    AlreadyAdvanced(OrderStatus),
    #[error("Order code already in use: {0}")]
    DuplicateCode(String),
    #[error("Order database error: {0}")]
    DatabaseError(StoreError),
}

fn describe(status: &Option<OrderStatus>) -> &'static str {
    status.map(OrderStatus::label).unwrap_or("an unset status")
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { key, .. } => OrderError::DuplicateCode(key),
            other => OrderError::DatabaseError(other),
        }
    }
}
