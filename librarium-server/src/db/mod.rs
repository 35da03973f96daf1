//! Database layer: connection pool, schema setup, and repositories.

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{connect_with_retry, create_pool};
pub use repos::DbError;
