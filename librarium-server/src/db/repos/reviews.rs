//! Review repository
//!
//! Listing and creating reviews both verify the book exists first; a
//! missing book is a 404-shaped NotFound, applied uniformly.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{ReviewDraft, ReviewPatch};

/// Review record from the database
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub rating: i32,
    pub comment: String,
    pub date_posted: DateTime<Utc>,
}

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a book's reviews in id order; NotFound when the book does
    /// not exist.
    pub async fn list_for_book(&self, book_id: i64) -> Result<Vec<Review>, DbError> {
        self.ensure_book_exists(book_id).await?;

        let reviews = sqlx::query_as(
            r#"
            SELECT id, book_id, rating, comment, date_posted
            FROM reviews
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Get a single review by id.
    pub async fn get(&self, id: i64) -> Result<Review, DbError> {
        sqlx::query_as(
            "SELECT id, book_id, rating, comment, date_posted FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "review",
            id,
        })
    }

    /// Insert a review for a book, verifying the book inside the same
    /// transaction as the write.
    pub async fn create(&self, book_id: i64, draft: ReviewDraft) -> Result<Review, DbError> {
        let mut tx = self.pool.begin().await?;

        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists.0 {
            return Err(DbError::NotFound {
                resource: "book",
                id: book_id,
            });
        }

        let review: Review = sqlx::query_as(
            r#"
            INSERT INTO reviews (book_id, rating, comment, date_posted)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, rating, comment, date_posted
            "#,
        )
        .bind(book_id)
        .bind(draft.rating.value())
        .bind(&draft.comment)
        .bind(draft.date_posted)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from_write)?;

        tx.commit().await?;

        Ok(review)
    }

    /// Apply a partial update; the rating has already been range
    /// checked by the caller.
    pub async fn update(&self, id: i64, patch: ReviewPatch) -> Result<Review, DbError> {
        sqlx::query_as(
            r#"
            UPDATE reviews
            SET rating = COALESCE($2, rating),
                comment = COALESCE($3, comment),
                date_posted = COALESCE($4, date_posted)
            WHERE id = $1
            RETURNING id, book_id, rating, comment, date_posted
            "#,
        )
        .bind(id)
        .bind(patch.rating)
        .bind(&patch.comment)
        .bind(patch.date_posted)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "review",
            id,
        })
    }

    /// Delete a review.
    pub async fn delete(&self, id: i64) -> Result<Review, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM reviews
            WHERE id = $1
            RETURNING id, book_id, rating, comment, date_posted
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "review",
            id,
        })
    }

    async fn ensure_book_exists(&self, book_id: i64) -> Result<(), DbError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(self.pool)
            .await?;
        if !exists.0 {
            return Err(DbError::NotFound {
                resource: "book",
                id: book_id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{AuthorRepo, BookRepo};
    use crate::models::{AuthorDraft, BookDraft};
    use chrono::NaiveDate;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("schema");
        pool
    }

    async fn seed_book(pool: &PgPool) -> (i64, i64) {
        let author = AuthorRepo::new(pool)
            .create(
                AuthorDraft::new(
                    "Review Author".into(),
                    None,
                    NaiveDate::from_ymd_opt(1935, 3, 3).unwrap(),
                )
                .unwrap(),
            )
            .await
            .expect("author");
        let book = BookRepo::new(pool)
            .create(
                BookDraft::new(
                    "Reviewed Book".into(),
                    "978-0000000000".into(),
                    2001,
                    None,
                    author.id,
                )
                .unwrap(),
            )
            .await
            .expect("book");
        (author.id, book.book.id)
    }

    fn draft(rating: i32) -> ReviewDraft {
        ReviewDraft::new(rating, "worth reading".into(), Utc::now()).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_and_list_for_book() {
        let pool = test_pool().await;
        let (author_id, book_id) = seed_book(&pool).await;
        let repo = ReviewRepo::new(&pool);

        repo.create(book_id, draft(5)).await.expect("create");
        repo.create(book_id, draft(1)).await.expect("create");

        let reviews = repo.list_for_book(book_id).await.expect("list");
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, 5);

        AuthorRepo::new(&pool).delete(author_id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_for_missing_book_is_not_found() {
        let pool = test_pool().await;
        let err = ReviewRepo::new(&pool).list_for_book(i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "book", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn book_delete_cascades_to_reviews() {
        let pool = test_pool().await;
        let (author_id, book_id) = seed_book(&pool).await;
        let repo = ReviewRepo::new(&pool);

        let review = repo.create(book_id, draft(3)).await.expect("create");
        BookRepo::new(&pool).delete(book_id).await.expect("delete book");

        let err = repo.get(review.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "review", .. }));

        // Listing for the deleted book is itself a 404 now
        let err = repo.list_for_book(book_id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "book", .. }));

        AuthorRepo::new(&pool).delete(author_id).await.expect("cleanup");
    }
}
