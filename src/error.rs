use axum::extract::rejection::BytesRejection;
use axum::http::header::ALLOW;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Validation(Vec<String>),
    MethodNotAllowed,
    BadRequest(String),
    PayloadTooLarge(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join(", ")),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                let body = json!({
                    "status": "error",
                    "message": "Validation failed",
                    "errors": errors,
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            AppError::MethodNotAllowed => {
                let body = json!({ "status": "error", "message": "Method not allowed" });
                let mut response = (StatusCode::METHOD_NOT_ALLOWED, axum::Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("POST, OPTIONS"));
                response
            }
            AppError::BadRequest(msg) => {
                let body = json!({ "status": "error", "message": msg });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Rejected oversized submission: {msg}");
                let body = json!({ "status": "error", "message": "Request body too large" });
                (StatusCode::PAYLOAD_TOO_LARGE, axum::Json(body)).into_response()
            }
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}
