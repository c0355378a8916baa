use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::ValidationError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Killer no encontrado";

#[derive(Error, Debug)]
pub enum AppError {
    /// A storage failure. `message` is what the client sees; `source` is only logged.
    #[error("{message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: DbError,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Maps a repository error for a route whose generic failure text is `message`.
    pub fn from_db(message: &'static str, err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            source => AppError::Database { message, source },
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database { message, source } => {
                tracing::error!(error = ?source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::BadRequest(message) => {
                tracing::debug!(%message, "Rejected request.");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
