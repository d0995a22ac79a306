//! Repository for the `authors` table.

use bouquin_core::types::DbId;
use sqlx::PgPool;

use crate::models::author::{Author, CreateAuthor};

/// Column list for authors queries.
const COLUMNS: &str = "id, first_name, last_name, bio, created_at, updated_at";

/// Provides lookup and idempotent-creation operations for authors.
pub struct AuthorRepo;

impl AuthorRepo {
    /// List all authors, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authors ORDER BY last_name, first_name");
        sqlx::query_as::<_, Author>(&query).fetch_all(pool).await
    }

    /// Find an author by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE id = $1");
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an author by exact (last name, first name).
    pub async fn find_by_name(
        pool: &PgPool,
        last_name: &str,
        first_name: &str,
    ) -> Result<Option<Author>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM authors WHERE last_name = $1 AND first_name = $2");
        sqlx::query_as::<_, Author>(&query)
            .bind(last_name)
            .bind(first_name)
            .fetch_optional(pool)
            .await
    }

    /// Create a new author, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAuthor) -> Result<Author, sqlx::Error> {
        let query = format!(
            "INSERT INTO authors (first_name, last_name, bio)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    /// Insert an author or return the existing row with the same
    /// (last name, first name). Idempotent: repeated identical input never
    /// produces a duplicate.
    ///
    /// The conflict arm is a no-op update so the existing row is returned
    /// without racing a concurrent insert.
    pub async fn find_or_create(
        pool: &PgPool,
        input: &CreateAuthor,
    ) -> Result<Author, sqlx::Error> {
        let query = format!(
            "INSERT INTO authors (first_name, last_name, bio)
             VALUES ($1, $2, COALESCE($3, ''))
             ON CONFLICT ON CONSTRAINT uq_authors_name
             DO UPDATE SET updated_at = authors.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }
}
