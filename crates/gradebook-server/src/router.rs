//! Axum router wiring.
//!
//! Layer order, outermost first: request tracking (id, log, metrics), then
//! the panic guard, then the route. A panicking handler therefore still
//! produces a logged, counted 500 with an `x-request-id` header.

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use gradebook_core::GradebookError;

use crate::{api::assignments, app_state::AppState, error::ApiError, obs, ops};

pub fn build_router(state: AppState) -> Router {
    with_layers(routes(), state)
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ops::info))
        .route("/health", get(ops::health))
        .route("/ready", get(ops::ready))
        .route("/metrics", get(ops::metrics))
        .route("/assignments", get(assignments::list))
        .route("/assignments/submit", post(assignments::submit))
        .route("/assignments/:id", get(assignments::get))
        .route("/assignments/:id/grade", put(assignments::grade))
}

/// Add the JSON 404 fallback and the tracking/panic-guard stack to `routes`.
pub fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .fallback(ops::not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::middleware::track_request,
        ))
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    ApiError(GradebookError::Internal(format!("handler panicked: {detail}"))).into_response()
}
