use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ValidationPolicy;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::fields::DemoRequest;
use crate::submission::parser::{self, RawFields};
use crate::submission::pipeline::{self, PipelineResult};
use crate::submission::metadata;

pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your demo request has been submitted successfully. We will contact you shortly.";

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let parsed = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(&headers, body).await
    } else {
        parser::parse_body(content_type, &body)
    };

    // An unreadable body is an empty form; validation decides what happens next
    let raw = parsed.unwrap_or_else(|e| {
        tracing::warn!("Unreadable demo request body from {addr}: {e}");
        RawFields::new()
    });

    let context = metadata::extract(&headers, Some(addr.ip()), &state.config.trusted_proxies);
    let request = DemoRequest::from_fields(&raw);

    match pipeline::run(&state, &context, &request).await {
        PipelineResult::Rejected(errors)
            if state.config.validation_policy == ValidationPolicy::Strict =>
        {
            Err(AppError::Validation(
                errors.iter().map(|e| e.message().to_string()).collect(),
            ))
        }
        // Lenient rejections and mail failures alike look like success to the caller
        PipelineResult::Rejected(_) | PipelineResult::Accepted(_) => Ok((
            StatusCode::OK,
            Json(json!({ "status": "success", "message": SUCCESS_MESSAGE })),
        )
            .into_response()),
    }
}

/// CORS pre-flight. The CORS headers themselves come from the router layers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
