//! Database connection pool management
//!
//! Startup retries the initial connection a bounded number of times
//! with a fixed delay; exhausting the retries is fatal.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Maximum connections for the pool
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection attempts before giving up
const MAX_ATTEMPTS: u32 = 5;

/// Fixed delay between attempts
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Create a PostgreSQL connection pool without retry.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Create a pool, retrying a bounded number of times.
///
/// Used at startup where the database container may still be coming
/// up. The final attempt's error is returned when all retries are
/// exhausted.
pub async fn connect_with_retry(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match create_pool(database_url).await {
            Ok(pool) => {
                if attempt > 1 {
                    tracing::info!("database connection established on attempt {}", attempt);
                }
                return Ok(pool);
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    "database connection attempt {}/{} failed, retrying in {}s: {}",
                    attempt,
                    MAX_ATTEMPTS,
                    RETRY_DELAY.as_secs(),
                    e
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}
