use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type StudioResult<T> = Result<T, StudioError>;

/// Errors the outer application surfaces. Execution and sandbox failures
/// never appear here: they are terminal inside the preview pane.
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("chat service error: {0}")]
    Transport(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let status = match &self {
            StudioError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StudioError::Transport(_) => StatusCode::BAD_GATEWAY,
            StudioError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StudioError::NotFound(_) => StatusCode::NOT_FOUND,
            StudioError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StudioError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StudioError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
