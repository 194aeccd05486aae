//! Whole-request deadline.
//!
//! # Usage
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/conversation", post(converse))
//!     .layer(middleware::from_fn_with_state(Duration::from_secs(150), request_deadline));
//! ```
//!
//! A request that outlives the deadline is answered with 504 and the same
//! `{error, code}` body as upstream failures.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;

/// Runs the rest of the stack under `limit`.
pub async fn request_deadline(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(
                %method,
                %path,
                timeout_ms = limit.as_millis() as u64,
                "Request deadline exceeded"
            );
            let status = StatusCode::GATEWAY_TIMEOUT;
            let message = format!("request did not complete within {}s", limit.as_secs());
            (status, Json(ErrorResponse::new(status, message))).into_response()
        }
    }
}
