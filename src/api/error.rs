use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::InvalidObjectId;
use crate::order_actor::OrderError;
use crate::security::{GuardError, TokenError};
use crate::user_actor::UserError;

/// Every failure the HTTP surface can report. Rendered as
/// `{ "error": <code>, "message": <text> }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    TransitionUnavailable(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{message}")]
    Forbidden { code: &'static str, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::TransitionUnavailable(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::TransitionUnavailable(_) => "transition_unavailable",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden { code, .. } => *code,
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Timeout(_) => "timeout",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else if matches!(self, ApiError::Unauthorized(_) | ApiError::Forbidden { .. } | ApiError::Timeout(_)) {
            warn!(error = %self, "Request rejected");
        } else {
            debug!(error = %self, "Request rejected");
        }

        let message = match &self {
            // Store details stay in the logs.
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };
        let body = serde_json::json!({ "error": self.code(), "message": message });
        (status, Json(body)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            OrderError::TransitionUnavailable(_) => ApiError::TransitionUnavailable(err.to_string()),
            OrderError::AlreadyAdvanced(_) | OrderError::DuplicateCode(_) => ApiError::Conflict(err.to_string()),
            OrderError::DatabaseError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InsufficientGrant { .. } => ApiError::Forbidden {
                code: "forbidden",
                message: "You do not have permission to perform this action.".into(),
            },
            UserError::ValidationError(_) => ApiError::BadRequest(err.to_string()),
            UserError::DatabaseError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::PrincipalUnknown(_) => ApiError::Forbidden {
                code: "principal_unknown",
                message: "The acting user does not exist.".into(),
            },
            GuardError::MissingRole { .. } => ApiError::Forbidden {
                code: "forbidden",
                message: "You do not have permission to perform this action.".into(),
            },
            GuardError::Lookup(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => ApiError::Internal(err.to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<InvalidObjectId> for ApiError {
    fn from(err: InvalidObjectId) -> Self {
        ApiError::BadRequest(format!("Invalid ID format: {:?}", err.0))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
