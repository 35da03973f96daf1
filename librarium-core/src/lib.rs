//! librarium-core: shared configuration for the librarium services
//!
//! Configuration is read from the process environment at startup and
//! handed to the server as explicit values. Nothing in here touches
//! the network.

pub mod config;
pub mod error;

pub use config::{AppConfig, DatabaseConfig, HttpConfig, RateLimitConfig, RedisConfig};
pub use error::ConfigError;
