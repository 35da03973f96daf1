//! Domain model types shared across the HTTP and database layers.
//!
//! Request payloads are validated here before they reach a repository;
//! the database's own constraints remain the backstop.

pub mod author;
pub mod book;
pub mod pagination;
pub mod review;
pub mod validation;

pub use author::{AuthorDraft, AuthorPatch};
pub use book::{BookDraft, BookPatch};
pub use pagination::{Pagination, PaginationParams};
pub use review::{Rating, ReviewDraft, ReviewPatch};
pub use validation::ValidationError;
