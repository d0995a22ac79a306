//! Comment model and DTOs. Comments carry no aggregate side effects.

use bouquin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub book_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author's display name, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithUser {
    pub id: DbId,
    pub book_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for posting a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
}

/// Request body for editing a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub content: Option<String>,
}
