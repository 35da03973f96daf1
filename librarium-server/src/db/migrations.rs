//! Schema setup for the library tables.
//!
//! All statements are idempotent so repeated startups are safe. The
//! foreign-key constraints are added separately from the table DDL,
//! checking `pg_constraint` first; a failure to add a constraint is
//! logged and startup continues, since the service-layer checks still
//! cover the invariant.

use sqlx::PgPool;

/// Create tables, foreign keys, and indexes.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("running library schema setup");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            biography TEXT,
            birth_date DATE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            isbn TEXT NOT NULL,
            publication_year INT NOT NULL,
            description TEXT,
            author_id BIGINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id BIGSERIAL PRIMARY KEY,
            book_id BIGINT NOT NULL,
            rating INT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT NOT NULL,
            date_posted TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Author deletion cascades to books, book deletion to reviews.
    ensure_foreign_key(
        pool,
        "fk_books_author_id",
        r#"
        ALTER TABLE books
        ADD CONSTRAINT fk_books_author_id
        FOREIGN KEY (author_id)
        REFERENCES authors(id)
        ON DELETE CASCADE
        "#,
    )
    .await?;

    ensure_foreign_key(
        pool,
        "fk_reviews_book_id",
        r#"
        ALTER TABLE reviews
        ADD CONSTRAINT fk_reviews_book_id
        FOREIGN KEY (book_id)
        REFERENCES books(id)
        ON DELETE CASCADE
        "#,
    )
    .await?;

    create_indexes(pool).await?;

    tracing::info!("library schema setup complete");
    Ok(())
}

/// Add a named foreign-key constraint if it is not already present.
///
/// The existence check keeps repeated startups from tripping over
/// duplicate-constraint errors. A failure to add the constraint is
/// downgraded to a warning.
async fn ensure_foreign_key(
    pool: &PgPool,
    constraint: &str,
    ddl: &str,
) -> Result<(), sqlx::Error> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_constraint WHERE conname = $1)")
            .bind(constraint)
            .fetch_one(pool)
            .await?;

    if exists.0 {
        return Ok(());
    }

    if let Err(e) = sqlx::query(ddl).execute(pool).await {
        tracing::warn!("could not add foreign key constraint {}: {}", constraint, e);
    }
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_book ON reviews(book_id)")
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn schema_setup_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");

        // Running twice must not error on existing tables/constraints
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
