use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Name, email, and phone are required")]
    MissingFields,

    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Database failures report the driver's own message without sqlx's wrapping.
    fn message(&self) -> String {
        match self {
            ApiError::Database(e) => e
                .as_database_error()
                .map(|db| db.message().to_string())
                .unwrap_or_else(|| e.to_string()),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => tracing::error!(error = %e, "database error"),
            other => tracing::debug!(error = %other, "rejected request"),
        }

        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
