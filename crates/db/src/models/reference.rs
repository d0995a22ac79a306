//! Fixed-vocabulary reference entities: languages, book types, the two-level
//! category hierarchy, themes, target audiences, and reading levels.

use bouquin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `languages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Language {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new language.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLanguage {
    pub code: String,
    pub name: String,
}

/// A row from the `book_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookType {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new book type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookType {
    pub name: String,
    pub description: String,
}

/// A row from the `categories_l1` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryL1 {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// A row from the `categories_l2` table. Unique per (parent, name).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryL2 {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub parent_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a category at either level; level-2 creation takes the
/// parent id from the route path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: String,
}

/// A row from the `themes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Theme {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new theme.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTheme {
    pub name: String,
    pub description: String,
}

/// A row from the `audiences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Audience {
    pub id: DbId,
    pub name: String,
    pub age_range: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new target audience.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAudience {
    pub name: String,
    pub age_range: String,
}

/// A row from the `reading_levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadingLevel {
    pub id: DbId,
    pub level: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new reading level.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReadingLevel {
    pub level: String,
    pub description: String,
}
