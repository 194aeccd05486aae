//! HTTP error mapping shared by all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::ConversationError;
use crate::ports::DialogError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: status.as_u16(),
        }
    }
}

/// Wraps application errors for conversion into HTTP responses.
#[derive(Debug)]
pub struct ApiError(ConversationError);

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code the error is reported with.
    ///
    /// Upstream rejections keep their own status when it is an error status;
    /// everything else about the dialog engine is a gateway failure.
    pub fn status(&self) -> StatusCode {
        let ConversationError::Dialog(err) = &self.0;
        match err {
            DialogError::Rejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            DialogError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            DialogError::AuthenticationFailed
            | DialogError::Network(_)
            | DialogError::Parse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "Request rejected upstream");
        }
        (status, Json(ErrorResponse::new(status, self.0.to_string()))).into_response()
    }
}
