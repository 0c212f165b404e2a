// src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure of a reporting request.
///
/// Every variant maps to `500` with a plain-text body; a request either
/// returns its whole payload or this.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("internal error: {self}"),
        )
            .into_response()
    }
}
