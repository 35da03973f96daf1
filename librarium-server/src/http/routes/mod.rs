//! Route handlers, one module per entity plus health and metrics.

pub mod authors;
pub mod books;
pub mod common;
pub mod health;
pub mod metrics;
pub mod reviews;
