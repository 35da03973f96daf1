//! Repository implementations for database access
//!
//! Each repository follows the same patterns:
//! - Typed CRUD over `&PgPool` with LIMIT/OFFSET list queries
//! - Book list/get JOINs the author row (no N+1)
//! - Reference-existence checks share a transaction with the write,
//!   so a referenced row cannot vanish between check and insert

pub mod authors;
pub mod books;
pub mod reviews;

pub use authors::{Author, AuthorRepo};
pub use books::{Book, BookRepo, BookWithAuthor};
pub use reviews::{Review, ReviewRepo};

/// SQLSTATE for foreign-key violations
const FK_VIOLATION: &str = "23503";

/// Database error type shared by the repositories
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("invalid {entity} reference")]
    InvalidReference { entity: &'static str },

    #[error("constraint violation: {constraint}")]
    Constraint { constraint: String },
}

impl DbError {
    /// Classify a write error, surfacing foreign-key violations that
    /// slipped past the service-layer check (the database stays the
    /// authority of record).
    fn from_write(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some(FK_VIOLATION) {
                return Self::Constraint {
                    constraint: db_err
                        .constraint()
                        .unwrap_or("foreign key")
                        .to_owned(),
                };
            }
        }
        Self::Sqlx(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = DbError::NotFound {
            resource: "book",
            id: 42,
        };
        assert_eq!(err.to_string(), "book 42 not found");
    }

    #[test]
    fn invalid_reference_display() {
        let err = DbError::InvalidReference { entity: "author" };
        assert_eq!(err.to_string(), "invalid author reference");
    }
}
