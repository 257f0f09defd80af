//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::lifecycle::LifecycleError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Identity required")]
    Unauthorized,
    #[error("{0}")]
    InvalidId(String),
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "IDENTITY_REQUIRED",
                "X-User-Id and X-User-Name headers are required".to_string(),
            ),
            ApiError::InvalidId(detail) => (StatusCode::BAD_REQUEST, "INVALID_ID", detail),
            ApiError::ConstraintViolation(detail) => {
                (StatusCode::BAD_REQUEST, "CONSTRAINT_VIOLATION", detail)
            }
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "DUPLICATE_REQUEST", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound { .. } | LifecycleError::NotInState { .. } => {
                ApiError::InvalidId(err.to_string())
            }
            LifecycleError::Validation { .. } => ApiError::ConstraintViolation(err.to_string()),
            LifecycleError::Duplicate => ApiError::Conflict(err.to_string()),
            LifecycleError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        tracing::debug!("Rejected path: {}", err.body_text());
        ApiError::InvalidId("Invalid ID".into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::ConstraintViolation(err.body_text())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "IDENTITY_REQUIRED");
    }

    #[tokio::test]
    async fn not_found_maps_to_400_invalid_id() {
        let api_err: ApiError = LifecycleError::NotFound { request_id: -34 }.into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_ID");
        assert_eq!(json["error"]["message"], "Invalid ID");
    }

    #[tokio::test]
    async fn validation_maps_to_constraint_violation() {
        let api_err: ApiError = LifecycleError::missing("suggestion").into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "CONSTRAINT_VIOLATION");
        assert!(json["error"]["message"].as_str().unwrap().contains("suggestion"));
    }

    #[tokio::test]
    async fn duplicate_returns_409() {
        let api_err: ApiError = LifecycleError::Duplicate.into();
        assert_eq!(api_err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn poisoned_lock_is_internal() {
        let api_err: ApiError = CoreError::LockPoisoned.into();
        assert_eq!(api_err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
