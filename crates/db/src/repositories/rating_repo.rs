//! Repository for the `ratings` table and the per-book rating aggregate.
//!
//! Every mutation runs as: write the rating, then recompute the owning
//! book's {average, count} from the full rating set, in ONE transaction.
//! The recompute UPDATE takes the book's row lock, so concurrent
//! submissions against the same book serialize and none can leave a stale
//! aggregate behind. The aggregate is never maintained incrementally.

use bouquin_core::pagination::{PageParams, Paged};
use bouquin_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::models::rating::{BookAggregate, Rating, RatingSubmission, RatingWithUser};

/// Column list for ratings queries.
const COLUMNS: &str = "id, book_id, user_id, score, created_at, updated_at";

/// Upsert result row: the rating plus the created-vs-updated flag.
///
/// `xmax = 0` holds only for a freshly inserted row, so it distinguishes
/// the insert arm of the upsert from the conflict-update arm.
#[derive(FromRow)]
struct UpsertRow {
    id: DbId,
    book_id: DbId,
    user_id: DbId,
    score: i32,
    created_at: Timestamp,
    updated_at: Timestamp,
    created: bool,
}

/// Recompute a book's aggregate from the full rating set.
///
/// Runs inside the caller's transaction; the write is not durable until
/// this has succeeded, so a caller can never observe a stale aggregate
/// after a successful response.
async fn recompute_aggregate(
    tx: &mut Transaction<'_, Postgres>,
    book_id: DbId,
) -> Result<BookAggregate, sqlx::Error> {
    sqlx::query_as::<_, BookAggregate>(
        "UPDATE books SET
            average_rating = COALESCE(
                (SELECT AVG(score)::DOUBLE PRECISION FROM ratings WHERE book_id = $1), 0),
            rating_count = (SELECT COUNT(*) FROM ratings WHERE book_id = $1),
            updated_at = now()
         WHERE id = $1
         RETURNING average_rating, rating_count",
    )
    .bind(book_id)
    .fetch_one(&mut **tx)
    .await
}

/// Provides the submit-or-update and delete operations for ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Submit a score for a (user, book) pair: inserts a new rating or
    /// updates the user's existing one in place, then refreshes the book's
    /// aggregate. The caller must have verified the book exists.
    pub async fn submit(
        pool: &PgPool,
        book_id: DbId,
        user_id: DbId,
        score: i32,
    ) -> Result<RatingSubmission, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO ratings (book_id, user_id, score)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_ratings_user_book
             DO UPDATE SET score = EXCLUDED.score, updated_at = now()
             RETURNING {COLUMNS}, (xmax = 0) AS created"
        );
        let row = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(book_id)
            .bind(user_id)
            .bind(score)
            .fetch_one(&mut *tx)
            .await?;

        let aggregate = recompute_aggregate(&mut tx, book_id).await?;
        tx.commit().await?;

        Ok(RatingSubmission {
            rating: Rating {
                id: row.id,
                book_id: row.book_id,
                user_id: row.user_id,
                score: row.score,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            created: row.created,
            aggregate,
        })
    }

    /// Delete a rating and refresh the owning book's aggregate, returning
    /// the refreshed values.
    pub async fn delete(
        pool: &PgPool,
        rating_id: DbId,
        book_id: DbId,
    ) -> Result<BookAggregate, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(rating_id)
            .execute(&mut *tx)
            .await?;

        let aggregate = recompute_aggregate(&mut tx, book_id).await?;
        tx.commit().await?;
        Ok(aggregate)
    }

    /// Find a rating by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE id = $1");
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find one user's rating for one book, if any.
    pub async fn find_own(
        pool: &PgPool,
        book_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE book_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Rating>(&query)
            .bind(book_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Page through a book's ratings, newest first, with author names.
    pub async fn list_by_book(
        pool: &PgPool,
        book_id: DbId,
        page: PageParams,
    ) -> Result<Paged<RatingWithUser>, sqlx::Error> {
        let items = sqlx::query_as::<_, RatingWithUser>(
            "SELECT r.id, r.book_id, r.user_id, r.score,
                    u.first_name AS user_first_name, u.last_name AS user_last_name,
                    r.created_at, r.updated_at
             FROM ratings r
             INNER JOIN users u ON u.id = r.user_id
             WHERE r.book_id = $1
             ORDER BY r.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(book_id)
        .bind(page.size())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM ratings WHERE book_id = $1")
                .bind(book_id)
                .fetch_one(pool)
                .await?;

        Ok(Paged::new(items, page, total))
    }
}
