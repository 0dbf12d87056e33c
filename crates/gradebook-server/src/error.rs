//! HTTP surface of `GradebookError`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use gradebook_core::error::{ClientCode, GradebookError};

/// Handler error. Wraps the core error so it can implement `IntoResponse`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub GradebookError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        ApiError(GradebookError::InvalidInput(r.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        ApiError(GradebookError::InvalidInput(r.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        ApiError(GradebookError::InvalidInput(r.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let message = match &self.0 {
            GradebookError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                "internal server error".to_string()
            }
            GradebookError::InvalidInput(msg) | GradebookError::NotFound(msg) => msg.clone(),
        };
        let body = Json(json!({
            "error": code.as_str(),
            "message": message,
        }));
        (self.status(), body).into_response()
    }
}
