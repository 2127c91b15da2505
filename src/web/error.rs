use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum WebError {
    NotFound(String),

    Database(String),

    Validation(String),

    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::NotFound(msg) => write!(f, "Not found: {}", msg),
            WebError::Database(msg) => write!(f, "Database error: {}", msg),
            WebError::Validation(msg) => write!(f, "Validation error: {}", msg),
            WebError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WebError {}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            WebError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            WebError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            WebError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: error_message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::Internal(err.to_string())
    }
}

impl WebError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        WebError::NotFound(msg.into())
    }

    pub fn database(err: anyhow::Error) -> Self {
        WebError::Database(format!("{err:#}"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        WebError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        WebError::Internal(msg.into())
    }
}
