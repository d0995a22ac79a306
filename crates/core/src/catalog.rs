//! Catalog domain types: the book variant tagged union, file formats,
//! and the sort-specification parser used by the query engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Variant discriminator
   -------------------------------------------------------------------------- */

/// Discriminator selecting which variant payload a book record carries.
///
/// The discriminator is fixed at creation time; update paths must never
/// change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookKind {
    Digital,
    Audio,
}

impl BookKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BookKind::Digital => "digital",
            BookKind::Audio => "audio",
        }
    }
}

impl fmt::Display for BookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digital" => Ok(BookKind::Digital),
            "audio" => Ok(BookKind::Audio),
            other => Err(CoreError::Validation(format!(
                "Invalid book kind '{other}'. Must be one of: digital, audio"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
   Digital file formats
   -------------------------------------------------------------------------- */

/// File format of a digital book's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileFormat {
    Pdf,
    Epub,
    Mobi,
    Html,
}

impl FileFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Pdf => "PDF",
            FileFormat::Epub => "EPUB",
            FileFormat::Mobi => "MOBI",
            FileFormat::Html => "HTML",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDF" => Ok(FileFormat::Pdf),
            "EPUB" => Ok(FileFormat::Epub),
            "MOBI" => Ok(FileFormat::Mobi),
            "HTML" => Ok(FileFormat::Html),
            other => Err(CoreError::Validation(format!(
                "Invalid file format '{other}'. Must be one of: PDF, EPUB, MOBI, HTML"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
   Variant payload
   -------------------------------------------------------------------------- */

/// Variant payload of a book. Exactly one variant is present per record and
/// it always matches the stored discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookVariant {
    Digital {
        file_format: FileFormat,
        file_path: String,
    },
    Audio {
        duration_minutes: i32,
        narrator: String,
        audio_path: String,
    },
}

impl BookVariant {
    pub fn kind(&self) -> BookKind {
        match self {
            BookVariant::Digital { .. } => BookKind::Digital,
            BookVariant::Audio { .. } => BookKind::Audio,
        }
    }
}

/* --------------------------------------------------------------------------
   Price
   -------------------------------------------------------------------------- */

/// Validate that a price is non-negative.
pub fn validate_price(price: f64) -> Result<(), CoreError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Price must be a non-negative number, got {price}"
        )))
    }
}

/* --------------------------------------------------------------------------
   Sort specification
   -------------------------------------------------------------------------- */

/// Column names the book listing may sort by. Anything outside this
/// whitelist is rejected before it can reach an ORDER BY clause.
const SORTABLE_COLUMNS: &[&str] = &[
    "title",
    "price",
    "date_published",
    "popularity",
    "average_rating",
    "created_at",
];

/// A validated sort plan for the book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Whitelisted column name, safe to interpolate into SQL.
    pub column: &'static str,
    pub descending: bool,
}

impl Default for SortSpec {
    /// Newest publications first.
    fn default() -> Self {
        SortSpec {
            column: "date_published",
            descending: true,
        }
    }
}

/// Parse a sort parameter of the form `field` or `-field` (descending).
///
/// `None` yields the default sort (publication date, descending).
pub fn parse_sort(spec: Option<&str>) -> Result<SortSpec, CoreError> {
    let Some(raw) = spec else {
        return Ok(SortSpec::default());
    };

    let (field, descending) = match raw.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };

    match SORTABLE_COLUMNS.iter().find(|c| **c == field) {
        Some(column) => Ok(SortSpec { column, descending }),
        None => Err(CoreError::Validation(format!(
            "Cannot sort by '{field}'. Must be one of: {}",
            SORTABLE_COLUMNS.join(", ")
        ))),
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
