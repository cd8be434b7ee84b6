// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{repository::RepoError, scoring::ScoringError};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 500, the data layer failed
    PersistenceError(String),

    // 500, grading succeeded but the attempt could not be stored.
    // Carries the computed result so the client can still show it.
    AttemptNotSaved {
        score: i64,
        total_questions: usize,
        reason: String,
    },

    // 400 Bad Request (validation)
    BadRequest(String),

    // 401 Unauthorized (no or invalid identity)
    AuthError(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::PersistenceError(msg) => {
                tracing::error!("Persistence error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Storage unavailable" }),
                )
            }
            AppError::AttemptNotSaved {
                score,
                total_questions,
                reason,
            } => {
                tracing::error!("Attempt graded but not saved: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Your attempt was graded but could not be saved",
                        "score": score,
                        "total_questions": total_questions,
                        "saved": false,
                    }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows using `?` on repository calls.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::PersistenceError(err.to_string())
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
