//! Book entity model, creation/update DTOs, and the listing filter shape.
//!
//! The database stores both variants in one `books` table behind the `kind`
//! discriminator; [`Book`] lifts the flat row into the [`BookVariant`]
//! tagged union so callers never see the nullable payload columns.

use std::str::FromStr;

use bouquin_core::catalog::{self, BookKind, BookVariant, FileFormat};
use bouquin_core::error::CoreError;
use bouquin_core::pagination::PageParams;
use bouquin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::models::author::{Author, AuthorRef};
use crate::models::comment::CommentWithUser;
use crate::models::rating::RatingWithUser;
use crate::models::reference::{
    Audience, BookType, CategoryL1, CategoryL2, Language, ReadingLevel, Theme,
};
use crate::models::user::UserSummary;

/* --------------------------------------------------------------------------
   Entity
   -------------------------------------------------------------------------- */

/// A book record with its variant payload.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_free: bool,
    pub date_published: Timestamp,
    pub is_published: bool,
    pub popularity: i64,
    pub average_rating: f64,
    pub rating_count: i64,
    pub cover_path: String,
    pub publisher_id: DbId,
    pub language_id: DbId,
    pub book_type_id: DbId,
    pub audience_id: DbId,
    pub reading_level_id: DbId,
    #[serde(flatten)]
    pub variant: BookVariant,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn decode_err(
    index: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(source),
    }
}

impl FromRow<'_, PgRow> for Book {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let kind: BookKind = row
            .try_get::<String, _>("kind")?
            .parse()
            .map_err(|e| decode_err("kind", e))?;

        // ck_books_variant guarantees the matching payload columns are set;
        // a violation here means the row predates the constraint.
        let variant = match kind {
            BookKind::Digital => {
                let file_format: Option<String> = row.try_get("file_format")?;
                let file_path: Option<String> = row.try_get("file_path")?;
                match (file_format, file_path) {
                    (Some(format), Some(file_path)) => BookVariant::Digital {
                        file_format: FileFormat::from_str(&format)
                            .map_err(|e| decode_err("file_format", e))?,
                        file_path,
                    },
                    _ => {
                        return Err(decode_err(
                            "file_format",
                            CoreError::Internal(
                                "digital book row is missing its variant payload".to_string(),
                            ),
                        ))
                    }
                }
            }
            BookKind::Audio => {
                let duration_minutes: Option<i32> = row.try_get("duration_minutes")?;
                let narrator: Option<String> = row.try_get("narrator")?;
                let audio_path: Option<String> = row.try_get("audio_path")?;
                match (duration_minutes, narrator, audio_path) {
                    (Some(duration_minutes), Some(narrator), Some(audio_path)) => {
                        BookVariant::Audio {
                            duration_minutes,
                            narrator,
                            audio_path,
                        }
                    }
                    _ => {
                        return Err(decode_err(
                            "narrator",
                            CoreError::Internal(
                                "audio book row is missing its variant payload".to_string(),
                            ),
                        ))
                    }
                }
            }
        };

        Ok(Book {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            is_free: row.try_get("is_free")?,
            date_published: row.try_get("date_published")?,
            is_published: row.try_get("is_published")?,
            popularity: row.try_get("popularity")?,
            average_rating: row.try_get("average_rating")?,
            rating_count: row.try_get("rating_count")?,
            cover_path: row.try_get("cover_path")?,
            publisher_id: row.try_get("publisher_id")?,
            language_id: row.try_get("language_id")?,
            book_type_id: row.try_get("book_type_id")?,
            audience_id: row.try_get("audience_id")?,
            reading_level_id: row.try_get("reading_level_id")?,
            variant,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Book plus joined reference data and nested comments/ratings, as served
/// by the get-by-id endpoint.
#[derive(Debug, Serialize)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub authors: Vec<Author>,
    pub publisher: UserSummary,
    pub language: Language,
    pub book_type: BookType,
    pub categories_l1: Vec<CategoryL1>,
    pub categories_l2: Vec<CategoryL2>,
    pub themes: Vec<Theme>,
    pub audience: Audience,
    pub reading_level: ReadingLevel,
    pub comments: Vec<CommentWithUser>,
    pub ratings: Vec<RatingWithUser>,
}

/// Result of flipping a book's publication flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicationState {
    pub id: DbId,
    pub title: String,
    pub is_published: bool,
}

/* --------------------------------------------------------------------------
   Create DTO
   -------------------------------------------------------------------------- */

/// DTO for creating a new book.
///
/// Required common fields are `Option` so that [`CreateBook::validate`] can
/// report every missing field in one pass instead of failing at
/// deserialization with a generic message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub is_free: bool,
    pub cover_path: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    pub language_id: Option<DbId>,
    pub book_type_id: Option<DbId>,
    #[serde(default)]
    pub category_l1_ids: Vec<DbId>,
    #[serde(default)]
    pub category_l2_ids: Vec<DbId>,
    #[serde(default)]
    pub theme_ids: Vec<DbId>,
    pub audience_id: Option<DbId>,
    pub reading_level_id: Option<DbId>,
    pub kind: Option<String>,
    // Digital payload
    pub file_format: Option<String>,
    pub file_path: Option<String>,
    // Audio payload
    pub duration_minutes: Option<i32>,
    pub narrator: Option<String>,
    pub audio_path: Option<String>,
}

/// A validated, normalized book ready to persist. Free books already have
/// their price forced to zero and the variant payload is fully typed.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_free: bool,
    pub cover_path: Option<String>,
    pub language_id: DbId,
    pub book_type_id: DbId,
    pub category_l1_ids: Vec<DbId>,
    pub category_l2_ids: Vec<DbId>,
    pub theme_ids: Vec<DbId>,
    pub audience_id: DbId,
    pub reading_level_id: DbId,
    pub variant: BookVariant,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl CreateBook {
    /// Check every required common and variant-specific field, reporting all
    /// missing ones in a single validation error, then produce the
    /// normalized [`BookDraft`].
    pub fn validate(&self) -> Result<BookDraft, CoreError> {
        let mut missing: Vec<&str> = Vec::new();

        if present(&self.title).is_none() {
            missing.push("title");
        }
        if present(&self.description).is_none() {
            missing.push("description");
        }
        if self.authors.is_empty() {
            missing.push("authors");
        }
        if self.language_id.is_none() {
            missing.push("language_id");
        }
        if self.book_type_id.is_none() {
            missing.push("book_type_id");
        }
        if self.category_l1_ids.is_empty() {
            missing.push("category_l1_ids");
        }
        if self.audience_id.is_none() {
            missing.push("audience_id");
        }
        if self.reading_level_id.is_none() {
            missing.push("reading_level_id");
        }

        let kind = match present(&self.kind) {
            Some(raw) => Some(BookKind::from_str(raw)?),
            None => {
                missing.push("kind");
                None
            }
        };

        match kind {
            Some(BookKind::Digital) => {
                if present(&self.file_format).is_none() {
                    missing.push("file_format");
                }
                if present(&self.file_path).is_none() {
                    missing.push("file_path");
                }
            }
            Some(BookKind::Audio) => {
                if self.duration_minutes.is_none() {
                    missing.push("duration_minutes");
                }
                if present(&self.narrator).is_none() {
                    missing.push("narrator");
                }
                if present(&self.audio_path).is_none() {
                    missing.push("audio_path");
                }
            }
            None => {}
        }

        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }

        // All fields are present past this point.
        let variant = match kind {
            Some(BookKind::Digital) => BookVariant::Digital {
                file_format: FileFormat::from_str(present(&self.file_format).unwrap_or_default())?,
                file_path: present(&self.file_path).unwrap_or_default().to_string(),
            },
            Some(BookKind::Audio) => {
                let duration_minutes = self.duration_minutes.unwrap_or_default();
                if duration_minutes <= 0 {
                    return Err(CoreError::Validation(format!(
                        "Duration must be a positive number of minutes, got {duration_minutes}"
                    )));
                }
                BookVariant::Audio {
                    duration_minutes,
                    narrator: present(&self.narrator).unwrap_or_default().to_string(),
                    audio_path: present(&self.audio_path).unwrap_or_default().to_string(),
                }
            }
            None => unreachable!("kind checked above"),
        };

        // Free books are stored with a zero price no matter what was sent.
        let price = if self.is_free {
            0.0
        } else {
            self.price.unwrap_or(0.0)
        };
        catalog::validate_price(price)?;

        Ok(BookDraft {
            title: present(&self.title).unwrap_or_default().to_string(),
            description: present(&self.description).unwrap_or_default().to_string(),
            price,
            is_free: self.is_free,
            cover_path: present(&self.cover_path).map(str::to_string),
            language_id: self.language_id.unwrap_or_default(),
            book_type_id: self.book_type_id.unwrap_or_default(),
            category_l1_ids: self.category_l1_ids.clone(),
            category_l2_ids: self.category_l2_ids.clone(),
            theme_ids: self.theme_ids.clone(),
            audience_id: self.audience_id.unwrap_or_default(),
            reading_level_id: self.reading_level_id.unwrap_or_default(),
            variant,
        })
    }
}

/* --------------------------------------------------------------------------
   Update DTO
   -------------------------------------------------------------------------- */

/// DTO for patching an existing book. Absent fields keep their current
/// value; the `kind` discriminator is not patchable, and variant fields are
/// only applied when they match the book's existing discriminator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_free: Option<bool>,
    pub cover_path: Option<String>,
    pub author_ids: Option<Vec<DbId>>,
    pub language_id: Option<DbId>,
    pub book_type_id: Option<DbId>,
    pub category_l1_ids: Option<Vec<DbId>>,
    pub category_l2_ids: Option<Vec<DbId>>,
    pub theme_ids: Option<Vec<DbId>>,
    pub audience_id: Option<DbId>,
    pub reading_level_id: Option<DbId>,
    // Digital payload
    pub file_format: Option<String>,
    pub file_path: Option<String>,
    // Audio payload
    pub duration_minutes: Option<i32>,
    pub narrator: Option<String>,
    pub audio_path: Option<String>,
}

impl UpdateBook {
    /// Validate the patch values that carry range or non-empty rules.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(price) = self.price {
            catalog::validate_price(price)?;
        }
        if let Some(format) = present(&self.file_format) {
            FileFormat::from_str(format)?;
        }
        if let Some(duration) = self.duration_minutes {
            if duration <= 0 {
                return Err(CoreError::Validation(format!(
                    "Duration must be a positive number of minutes, got {duration}"
                )));
            }
        }
        if matches!(&self.author_ids, Some(ids) if ids.is_empty()) {
            return Err(CoreError::Validation(
                "A book must keep at least one author".to_string(),
            ));
        }
        if matches!(&self.category_l1_ids, Some(ids) if ids.is_empty()) {
            return Err(CoreError::Validation(
                "A book must keep at least one level-1 category".to_string(),
            ));
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Listing filters
   -------------------------------------------------------------------------- */

/// Optional filter, sort, and pagination parameters for the book listing.
/// Absent keys impose no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    pub is_published: Option<bool>,
    pub is_free: Option<bool>,
    pub kind: Option<BookKind>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub published_from: Option<Timestamp>,
    pub published_to: Option<Timestamp>,
    pub category_l1: Option<DbId>,
    pub category_l2: Option<DbId>,
    pub language: Option<DbId>,
    pub book_type: Option<DbId>,
    pub theme: Option<DbId>,
    pub author: Option<DbId>,
    pub audience: Option<DbId>,
    pub reading_level: Option<DbId>,
    pub publisher: Option<DbId>,
    /// Only applied when `kind` is `digital`.
    pub file_format: Option<String>,
    /// Only applied when `kind` is `audio`.
    pub max_duration: Option<i32>,
    /// Sort field, `-` prefix for descending. Default: `-date_published`.
    pub sort: Option<String>,
    // Kept as plain fields (not a flattened struct): axum's Query extractor
    // cannot drive serde(flatten) through typed primitives.
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl BookQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            size: self.size,
        }
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
