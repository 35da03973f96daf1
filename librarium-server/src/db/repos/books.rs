//! Book repository
//!
//! List and get JOIN the author row in a single query. Creates and
//! author-reference updates run the existence check and the write in
//! one transaction, so the author cannot be deleted in between.

use sqlx::{FromRow, PgPool, Row};

use super::authors::Author;
use super::DbError;
use crate::models::{BookDraft, BookPatch, Pagination};

/// Book record from the database
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub publication_year: i32,
    pub description: Option<String>,
    pub author_id: i64,
}

/// Book with its author materialized
#[derive(Debug, Clone)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author: Author,
}

fn row_to_book_with_author(row: &sqlx::postgres::PgRow) -> BookWithAuthor {
    BookWithAuthor {
        book: Book {
            id: row.get("id"),
            title: row.get("title"),
            isbn: row.get("isbn"),
            publication_year: row.get("publication_year"),
            description: row.get("description"),
            author_id: row.get("author_id"),
        },
        author: Author {
            id: row.get("a_id"),
            name: row.get("a_name"),
            biography: row.get("a_biography"),
            birth_date: row.get("a_birth_date"),
        },
    }
}

const BOOK_WITH_AUTHOR_COLUMNS: &str = r#"
    b.id, b.title, b.isbn, b.publication_year, b.description, b.author_id,
    a.id AS a_id, a.name AS a_name, a.biography AS a_biography,
    a.birth_date AS a_birth_date
"#;

/// Book repository
pub struct BookRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List books with their authors, id order, single query.
    pub async fn list(&self, page: Pagination) -> Result<Vec<BookWithAuthor>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOK_WITH_AUTHOR_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(row_to_book_with_author).collect())
    }

    /// Get a single book with its author.
    pub async fn get(&self, id: i64) -> Result<BookWithAuthor, DbError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {BOOK_WITH_AUTHOR_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "book",
            id,
        })?;

        Ok(row_to_book_with_author(&row))
    }

    /// Insert a book after verifying the author reference, both inside
    /// one transaction.
    pub async fn create(&self, draft: BookDraft) -> Result<BookWithAuthor, DbError> {
        let mut tx = self.pool.begin().await?;

        let author: Option<Author> = sqlx::query_as(
            "SELECT id, name, biography, birth_date FROM authors WHERE id = $1",
        )
        .bind(draft.author_id)
        .fetch_optional(&mut *tx)
        .await?;

        let author = author.ok_or(DbError::InvalidReference { entity: "author" })?;

        let book: Book = sqlx::query_as(
            r#"
            INSERT INTO books (title, isbn, publication_year, description, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, isbn, publication_year, description, author_id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.isbn)
        .bind(draft.publication_year)
        .bind(&draft.description)
        .bind(draft.author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from_write)?;

        tx.commit().await?;

        Ok(BookWithAuthor { book, author })
    }

    /// Apply a partial update. A changed author reference is
    /// re-validated in the same transaction as the write.
    pub async fn update(&self, id: i64, patch: BookPatch) -> Result<BookWithAuthor, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(author_id) = patch.author_id {
            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
                    .bind(author_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists.0 {
                return Err(DbError::InvalidReference { entity: "author" });
            }
        }

        let book: Book = sqlx::query_as(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                isbn = COALESCE($3, isbn),
                publication_year = COALESCE($4, publication_year),
                description = COALESCE($5, description),
                author_id = COALESCE($6, author_id)
            WHERE id = $1
            RETURNING id, title, isbn, publication_year, description, author_id
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.isbn)
        .bind(patch.publication_year)
        .bind(&patch.description)
        .bind(patch.author_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from_write)?
        .ok_or(DbError::NotFound {
            resource: "book",
            id,
        })?;

        let author: Author = sqlx::query_as(
            "SELECT id, name, biography, birth_date FROM authors WHERE id = $1",
        )
        .bind(book.author_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BookWithAuthor { book, author })
    }

    /// Delete a book; its reviews cascade away.
    pub async fn delete(&self, id: i64) -> Result<Book, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM books
            WHERE id = $1
            RETURNING id, title, isbn, publication_year, description, author_id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "book",
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::AuthorRepo;
    use crate::models::AuthorDraft;
    use chrono::NaiveDate;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("schema");
        pool
    }

    async fn seed_author(pool: &PgPool) -> Author {
        AuthorRepo::new(pool)
            .create(
                AuthorDraft::new(
                    "Test Author".into(),
                    None,
                    NaiveDate::from_ymd_opt(1960, 6, 1).unwrap(),
                )
                .unwrap(),
            )
            .await
            .expect("seed author")
    }

    fn draft(author_id: i64) -> BookDraft {
        BookDraft::new(
            "The Dispossessed".into(),
            "978-0061054884".into(),
            1974,
            None,
            author_id,
        )
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_loads_author_eagerly() {
        let pool = test_pool().await;
        let author = seed_author(&pool).await;

        let created = BookRepo::new(&pool).create(draft(author.id)).await.expect("create");
        assert_eq!(created.author.id, author.id);
        assert_eq!(created.book.author_id, author.id);

        let fetched = BookRepo::new(&pool).get(created.book.id).await.expect("get");
        assert_eq!(fetched.author.name, "Test Author");

        AuthorRepo::new(&pool).delete(author.id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_with_missing_author_is_rejected_and_not_persisted() {
        let pool = test_pool().await;

        let err = BookRepo::new(&pool).create(draft(i64::MAX)).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidReference { entity: "author" }));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(i64::MAX)
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn author_delete_cascades_to_books() {
        let pool = test_pool().await;
        let author = seed_author(&pool).await;
        let created = BookRepo::new(&pool).create(draft(author.id)).await.expect("create");

        AuthorRepo::new(&pool).delete(author.id).await.expect("delete author");

        let err = BookRepo::new(&pool).get(created.book.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "book", .. }));
    }
}
