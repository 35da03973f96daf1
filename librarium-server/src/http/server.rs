//! Axum server setup
//!
//! Layer order (outermost first): CORS, tracing, per-request timeout,
//! admission control, then the request counter and routes. Admission
//! control therefore completes before any handler work begins.
//! Graceful shutdown on SIGTERM/Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use librarium_core::HttpConfig;

use super::routes;
use crate::metrics;
use crate::ratelimit::{self, RateLimiter};

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
}

/// Build the application router without the outer middleware stack.
///
/// Health and metrics sit at the top level; entity routes are nested
/// under /api/v1. The request counter is attached here so every
/// matched route is counted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(routes::authors::router())
        .merge(routes::books::router())
        .merge(routes::reviews::router());

    Router::new()
        .merge(routes::health::router())
        .merge(routes::metrics::router())
        .nest("/api/v1", api)
        .layer(middleware::from_fn(metrics::track_requests))
        .with_state(state)
}

/// Run the HTTP server.
///
/// The pool and rate limiter are constructed by the caller at startup
/// and injected here; nothing in the server reaches for ambient state.
pub async fn run_server(
    pool: PgPool,
    limiter: RateLimiter,
    config: HttpConfig,
) -> Result<(), ServerError> {
    let state = Arc::new(AppState { pool });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state)
        .layer(middleware::from_fn_with_state(
            limiter,
            ratelimit::admission_middleware,
        ))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    // connect_lazy gives a pool without a live database; these tests
    // only exercise paths that fail before any query is issued.
    fn test_router() -> Router {
        let pool = PgPool::connect_lazy("postgres://postgres@localhost/librarium_test")
            .expect("lazy pool");
        build_router(Arc::new(AppState { pool }))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_route_is_wired() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn metrics_route_is_wired() {
        let response = test_router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected_before_storage() {
        let body = serde_json::json!({
            "rating": 6,
            "comment": "too enthusiastic",
            "date_posted": "2024-01-01T00:00:00Z"
        });
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/books/1/reviews")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "rating out of range [1,5]");
    }

    #[tokio::test]
    async fn empty_author_name_is_rejected_before_storage() {
        let body = serde_json::json!({
            "name": "",
            "birth_date": "1920-08-22"
        });
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/authors")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/authors")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn garbage_path_id_is_400() {
        let response = test_router()
            .oneshot(
                Request::get("/api/v1/authors/not-a-number")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_router()
            .oneshot(Request::get("/api/v1/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
