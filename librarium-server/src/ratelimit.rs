//! Admission control: per-client request counter with an expiring
//! window, backed by Redis.
//!
//! The counter protocol is a single atomic INCR on
//! `rate_limit:<client>`; whichever request observes the returned
//! value 1 attaches the window expiration in the same logical step.
//! Concurrent first-requests therefore cannot double-set the TTL, and
//! a key can never be incremented without an expiration being owned by
//! exactly one request. Counter-store failures reject the request
//! (fail-closed); allowing on error would defeat the control.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use librarium_core::RateLimitConfig;

use crate::http::error::ApiError;

/// Paths that bypass admission control entirely
const EXEMPT_PATHS: &[&str] = &["/health", "/metrics"];

/// Counter key prefix
const KEY_PREFIX: &str = "rate_limit";

/// Admission decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny,
}

/// Rate limiter error type
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("counter store unavailable: {0}")]
    Store(#[from] redis::RedisError),
}

/// Redis-backed request admission controller.
///
/// `ConnectionManager` handles reconnection; a clone is cheap and
/// shares the underlying multiplexed connection.
#[derive(Clone)]
pub struct RateLimiter {
    conn: ConnectionManager,
    limit: u64,
    window_secs: i64,
}

impl RateLimiter {
    /// Connect to the counter store.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis client cannot be created or the
    /// initial connection fails.
    pub async fn connect(redis_url: &str, config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(
            "rate limiter connected ({} requests per {}s window)",
            config.max_requests,
            config.window.as_secs()
        );
        Ok(Self {
            conn,
            limit: config.max_requests,
            window_secs: config.window.as_secs() as i64,
        })
    }

    /// Counter key for a client.
    fn key(client_key: &str) -> String {
        format!("{}:{}", KEY_PREFIX, client_key)
    }

    /// Decide whether to admit one request from `client_key`.
    ///
    /// Increment first, then compare: the increment is the atomic
    /// step, so concurrent requests near the boundary each observe a
    /// distinct count and at most `limit` of them are permitted.
    pub async fn allow(&self, client_key: &str) -> Result<Decision, RateLimitError> {
        let key = Self::key(client_key);
        let mut conn = self.conn.clone();

        let count: u64 = conn.incr(&key, 1u64).await?;

        // First request in the window owns the expiration
        if count == 1 {
            let _: bool = conn.expire(&key, self.window_secs).await?;
        }

        if count > self.limit {
            Ok(Decision::Deny)
        } else {
            Ok(Decision::Permit)
        }
    }
}

/// Whether a path bypasses admission control.
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path)
}

/// Axum middleware applying admission control keyed by client address.
pub async fn admission_middleware(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    match limiter.allow(&addr.ip().to_string()).await {
        Ok(Decision::Permit) => next.run(request).await,
        Ok(Decision::Deny) => ApiError::RateLimited.into_response(),
        Err(e) => {
            tracing::error!("admission control store failure, rejecting request: {}", e);
            ApiError::StoreUnavailable.into_response()
        }
    }
}
