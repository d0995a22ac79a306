//! Author model and the inline-or-reference input shape used at book creation.

use bouquin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `authors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Author {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new author.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthor {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// An author reference as accepted by book creation: either the id of an
/// existing author or an inline record that is looked up by exact
/// (last name, first name) and created if absent.
///
/// Resolved to a canonical id before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(DbId),
    New(CreateAuthor),
}
