//! Prometheus metrics: request counter and text exposition.
//!
//! A dedicated registry keeps the exposition limited to what this
//! service registers. Labels use the matched route pattern rather than
//! the raw path to keep cardinality bounded.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Total requests by method and matched endpoint
pub static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("app_requests_total", "Total number of requests"),
        &["method", "endpoint"],
    )
    .expect("valid metric definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

/// Render the registry in Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Axum middleware incrementing the request counter.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    HTTP_REQUESTS.with_label_values(&[&method, &endpoint]).inc();

    next.run(request).await
}
