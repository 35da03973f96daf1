//! librarium-server: REST API for a book library
//!
//! Authors, books, and reviews over PostgreSQL, with Redis-backed
//! request admission control and Prometheus metrics. The binary crate
//! wires configuration, pool, and rate limiter together and calls
//! [`http::run_server`].

pub mod db;
pub mod http;
pub mod metrics;
pub mod models;
pub mod ratelimit;

pub use http::{build_router, run_server, AppState, ServerError};
pub use ratelimit::RateLimiter;
