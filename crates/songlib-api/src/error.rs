//! Mapping of `ExError` onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use songlib_core::{CatalogError, ExError, ExErrorKind};

/// Handler error; renders as `{"error": {"code", "message"}}`
#[derive(Debug)]
pub struct ApiError(pub ExError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ExErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ExErrorKind::NotFound => StatusCode::NOT_FOUND,
            ExErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }

        // internal details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.0.message().to_string()
        };
        let body = json!({
            "error": {
                "code": self.0.code(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
