//! Per-endpoint request metrics.
//!
//! - `requests_per_second`: counter, label `endpoint`
//! - `request_duration`: histogram in seconds, label `endpoint`
//!
//! The endpoint is the matched route template, so path parameters and
//! query strings never become label values.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// Label used for requests that matched no route.
const UNMATCHED_ENDPOINT: &str = "unmatched";

/// axum middleware recording every request, including rejected ones.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ENDPOINT, MatchedPath::as_str)
        .to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    record_http_request(endpoint, start.elapsed());

    response
}

/// For SSE this covers the time until the stream starts, not its lifetime.
fn record_http_request(endpoint: String, duration: Duration) {
    metrics::histogram!("request_duration", "endpoint" => endpoint.clone())
        .record(duration.as_secs_f64());
    metrics::counter!("requests_per_second", "endpoint" => endpoint).increment(1);
}
