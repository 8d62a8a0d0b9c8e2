pub mod intake;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn intake_routes(path: &str) -> Router<SharedState> {
    Router::new().route(
        path,
        post(intake::submit)
            .options(intake::preflight)
            .fallback(intake::method_not_allowed),
    )
}
