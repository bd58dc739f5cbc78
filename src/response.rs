//! Fixed responses that bypass the JSON error envelope.

use axum::http::StatusCode;

/// 403 with a plain text body for verbs a resource does not support.
pub fn unsupported(message: String) -> (StatusCode, String) {
    (StatusCode::FORBIDDEN, message)
}

/// Answer to a bare `OPTIONS` request.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
