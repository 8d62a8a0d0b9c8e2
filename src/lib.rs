pub mod audit;
pub mod client;
pub mod config;
pub mod email;
pub mod error;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::audit::AuditLog;
use crate::config::Config;
use crate::email::MailSender;
use crate::state::{AppState, SharedState};

pub fn build_app(
    config: Config,
    mailer: Option<Arc<dyn MailSender>>,
    audit: Arc<dyn AuditLog>,
) -> Result<Router, String> {
    let allowed_origin = HeaderValue::from_str(&config.allowed_origin)
        .map_err(|e| format!("Invalid allowed origin '{}': {e}", config.allowed_origin))?;

    if mailer.is_none() {
        tracing::warn!("No mail transport configured; demo requests will be logged but not mailed");
    }

    let intake = routes::intake_routes(&config.path)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            allowed_origin,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ));

    let state: SharedState = Arc::new(AppState {
        config,
        mailer,
        audit,
    });

    let app = Router::new()
        .merge(intake)
        .route("/health", axum::routing::get(health))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}
