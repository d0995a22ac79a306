//! Repository for the `comments` table.

use bouquin_core::pagination::{PageParams, Paged};
use bouquin_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentWithUser};

/// Column list for comments queries.
const COLUMNS: &str = "id, book_id, user_id, content, created_at, updated_at";

/// Column list for comments joined with their author's name.
const WITH_USER_COLUMNS: &str = "\
    c.id, c.book_id, c.user_id, c.content, \
    u.first_name AS user_first_name, u.last_name AS user_last_name, \
    c.created_at, c.updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Create a comment, returning it joined with the author's name.
    pub async fn create(
        pool: &PgPool,
        book_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<CommentWithUser, sqlx::Error> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO comments (book_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(book_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Self::find_with_user(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a comment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a comment joined with its author's name.
    pub async fn find_with_user(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommentWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_USER_COLUMNS}
             FROM comments c
             INNER JOIN users u ON u.id = c.user_id
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, CommentWithUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page through a book's comments, newest first.
    pub async fn list_by_book(
        pool: &PgPool,
        book_id: DbId,
        page: PageParams,
    ) -> Result<Paged<CommentWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_USER_COLUMNS}
             FROM comments c
             INNER JOIN users u ON u.id = c.user_id
             WHERE c.book_id = $1
             ORDER BY c.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, CommentWithUser>(&query)
            .bind(book_id)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM comments WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_one(pool)
        .await?;

        Ok(Paged::new(items, page, total))
    }

    /// Update a comment's content, keeping it when the patch is empty.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        content: Option<&str>,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET
                content = COALESCE($1, content),
                updated_at = now()
             WHERE id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(content)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment by its ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
