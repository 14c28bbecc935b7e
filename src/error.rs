//! Error taxonomy shared by the query layer and route handlers
//!
//! Store-level uniqueness violations are translated into `Duplicate` at the
//! query layer and never leak as raw sqlx errors. Anything else from the
//! store surfaces as a generic 500, logged with the underlying cause.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing required field or malformed query parameter
    #[error("{0}")]
    Validation(String),

    /// Uniqueness constraint violation (tweetbook name, tweet_id)
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Translate a unique-constraint violation into `Duplicate` with the
    /// given message; pass any other store error through.
    pub fn duplicate_or_db(err: sqlx::Error, message: &str) -> Self {
        let unique = err
            .as_database_error()
            .is_some_and(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation);
        if unique {
            ApiError::Duplicate(message.to_string())
        } else {
            ApiError::Database(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) | ApiError::Duplicate(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Database(err) => {
                tracing::error!("unhandled database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
