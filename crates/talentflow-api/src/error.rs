//! API error handling.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// A simulated or real storage failure; the client may retry.
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<talentflow_core::Error> for ApiError {
    fn from(err: talentflow_core::Error) -> Self {
        match err {
            talentflow_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            talentflow_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            talentflow_core::Error::Conflict(msg) => ApiError::Conflict(msg),
            talentflow_core::Error::Transient(msg) => ApiError::Unavailable(msg),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<talentflow_db::DbError> for ApiError {
    fn from(err: talentflow_db::DbError) -> Self {
        talentflow_core::Error::from(err).into()
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

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
