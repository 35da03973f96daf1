//! Configuration error types.
//!
//! Uses `thiserror` for structured errors; the binary crate wraps
//! these in `anyhow` at the boundary.

use thiserror::Error;

/// Error raised while reading configuration from the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing or empty
    #[error("missing required environment variable '{name}'")]
    MissingVar { name: &'static str },

    /// Environment variable is present but cannot be parsed
    #[error("invalid value '{value}' for environment variable '{name}'")]
    InvalidVar { name: &'static str, value: String },
}
