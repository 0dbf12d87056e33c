//! Per-request correlation id, access log, and HTTP metrics.
//!
//! Every request gets a fresh UUID that is recorded on a tracing span
//! wrapping the handler (so handler log lines carry it) and echoed back in
//! the `x-request-id` response header. Metric labels use the matched route
//! template rather than the raw path to keep cardinality bounded.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::obs::metrics::HttpMetrics;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Route label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Keeps the in-flight gauge honest when the connection drops mid-request.
struct InFlight<'a>(&'a HttpMetrics);

impl<'a> InFlight<'a> {
    fn enter(metrics: &'a HttpMetrics) -> Self {
        metrics.in_flight.inc(&[]);
        Self(metrics)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.dec(&[]);
    }
}

fn round_ms(d: Duration) -> f64 {
    (d.as_secs_f64() * 100_000.0).round() / 100.0
}

pub async fn track_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());

    let metrics = state.metrics();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path
    );

    let started = Instant::now();
    let mut response = {
        let _in_flight = InFlight::enter(&metrics);
        next.run(req).instrument(span).await
    };
    let elapsed = started.elapsed();
    let status = response.status();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status_code = status.as_u16(),
        duration_ms = round_ms(elapsed),
        "request completed"
    );

    metrics.requests.inc(&[
        ("method", method.as_str()),
        ("path", route.as_str()),
        ("status", status.as_str()),
    ]);
    metrics
        .request_duration
        .observe(&[("method", method.as_str()), ("path", route.as_str())], elapsed);

    if let Ok(v) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), v);
    }
    response
}
