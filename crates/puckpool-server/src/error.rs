// HTTP error responses for the API routes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request parameters; answered with 400 and never logged as an error.
    #[error("{0}")]
    BadRequest(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl ApiError {
    pub fn upstream(context: &'static str, source: UpstreamError) -> Self {
        ApiError::Upstream { context, source }
    }

    /// Response status: upstream 5xx codes pass through, anything else is 502.
    /// The body still reports the upstream status when there is one.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { source, .. } => source
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(StatusCode::is_server_error)
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::Upstream { context, source } => {
                error!("{}: {}", context, source);
                let upstream_status = source.status().unwrap_or(status.as_u16());
                json!({ "error": context, "status": upstream_status })
            }
        };
        (status, Json(body)).into_response()
    }
}
