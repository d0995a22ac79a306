//! Rating model and the aggregate types derived from it.

use bouquin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ratings` table. At most one exists per (user, book).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub book_id: DbId,
    pub user_id: DbId,
    pub score: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rating joined with its author's display name, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingWithUser {
    pub id: DbId,
    pub book_id: DbId,
    pub user_id: DbId,
    pub score: i32,
    pub user_first_name: String,
    pub user_last_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for submitting (or re-submitting) a rating.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRating {
    pub score: i32,
}

/// The derived {average, count} pair for one book, refreshed after every
/// rating write.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct BookAggregate {
    pub average_rating: f64,
    pub rating_count: i64,
}

/// Outcome of a rating upsert: the stored row, whether it was newly
/// created (as opposed to updated in place), and the refreshed aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct RatingSubmission {
    pub rating: Rating,
    #[serde(skip)]
    pub created: bool,
    pub aggregate: BookAggregate,
}
