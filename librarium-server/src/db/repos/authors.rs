//! Author repository

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{AuthorDraft, AuthorPatch, Pagination};

/// Author record from the database
#[derive(Debug, Clone, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: NaiveDate,
}

/// Author repository
pub struct AuthorRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthorRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List authors in id order.
    pub async fn list(&self, page: Pagination) -> Result<Vec<Author>, DbError> {
        let authors = sqlx::query_as(
            r#"
            SELECT id, name, biography, birth_date
            FROM authors
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(authors)
    }

    /// Get a single author by id.
    pub async fn get(&self, id: i64) -> Result<Author, DbError> {
        sqlx::query_as(
            "SELECT id, name, biography, birth_date FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "author",
            id,
        })
    }

    /// Insert an author, returning the row with its assigned id.
    pub async fn create(&self, draft: AuthorDraft) -> Result<Author, DbError> {
        let author = sqlx::query_as(
            r#"
            INSERT INTO authors (name, biography, birth_date)
            VALUES ($1, $2, $3)
            RETURNING id, name, biography, birth_date
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.biography)
        .bind(draft.birth_date)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(author)
    }

    /// Apply a partial update; absent fields keep their stored value.
    pub async fn update(&self, id: i64, patch: AuthorPatch) -> Result<Author, DbError> {
        sqlx::query_as(
            r#"
            UPDATE authors
            SET name = COALESCE($2, name),
                biography = COALESCE($3, biography),
                birth_date = COALESCE($4, birth_date)
            WHERE id = $1
            RETURNING id, name, biography, birth_date
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.biography)
        .bind(patch.birth_date)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "author",
            id,
        })
    }

    /// Delete an author; books (and their reviews) cascade away.
    pub async fn delete(&self, id: i64) -> Result<Author, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM authors
            WHERE id = $1
            RETURNING id, name, biography, birth_date
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "author",
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests - run with DATABASE_URL set:
    // cargo test -p librarium-server -- --ignored

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("schema");
        pool
    }

    fn draft(name: &str) -> AuthorDraft {
        AuthorDraft::new(
            name.into(),
            Some("test biography".into()),
            NaiveDate::from_ymd_opt(1950, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_roundtrip() {
        let pool = test_pool().await;
        let repo = AuthorRepo::new(&pool);

        let created = repo.create(draft("Ursula K. Le Guin")).await.expect("create");
        assert!(created.id > 0);

        let fetched = repo.get(created.id).await.expect("get");
        assert_eq!(fetched.name, "Ursula K. Le Guin");

        repo.delete(created.id).await.expect("delete");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_missing_is_not_found() {
        let pool = test_pool().await;
        let err = AuthorRepo::new(&pool).get(i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "author", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn partial_update_keeps_other_fields() {
        let pool = test_pool().await;
        let repo = AuthorRepo::new(&pool);

        let created = repo.create(draft("Octavia Butler")).await.expect("create");
        let updated = repo
            .update(
                created.id,
                AuthorPatch {
                    biography: Some("updated".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.name, "Octavia Butler");
        assert_eq!(updated.biography.as_deref(), Some("updated"));

        repo.delete(created.id).await.expect("delete");
    }
}
