use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::review::store::StoreError;
use crate::status::UnknownStatus;

/// Failure taxonomy for the review workflow. Every variant reaches the HTTP
/// boundary as a status code plus a human-readable message; nothing is
/// retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("caller is not allowed to perform this action")]
    Unauthorized,
    #[error("storage failure: {0}")]
    Persistence(#[from] StoreError),
}

impl From<UnknownStatus> for WorkflowError {
    fn from(err: UnknownStatus) -> Self {
        WorkflowError::Validation(err.to_string())
    }
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        let status = match self {
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WorkflowError::Unauthorized => StatusCode::FORBIDDEN,
            WorkflowError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
