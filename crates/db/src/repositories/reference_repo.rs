//! Repositories for the fixed-vocabulary reference tables.
//!
//! Uniqueness of the natural keys is enforced by the `uq_`-prefixed
//! constraints; a duplicate insert surfaces as a 409 at the API boundary.

use bouquin_core::types::DbId;
use sqlx::PgPool;

use crate::models::reference::{
    Audience, BookType, CategoryL1, CategoryL2, CreateAudience, CreateBookType, CreateCategory,
    CreateLanguage, CreateReadingLevel, CreateTheme, Language, ReadingLevel, Theme,
};

const LANGUAGE_COLUMNS: &str = "id, code, name, created_at";
const BOOK_TYPE_COLUMNS: &str = "id, name, description, created_at";
const CATEGORY_L1_COLUMNS: &str = "id, name, description, created_at";
const CATEGORY_L2_COLUMNS: &str = "id, name, description, parent_id, created_at";
const THEME_COLUMNS: &str = "id, name, description, created_at";
const AUDIENCE_COLUMNS: &str = "id, name, age_range, created_at";
const READING_LEVEL_COLUMNS: &str = "id, level, description, created_at";

/// Provides CRUD operations for languages.
pub struct LanguageRepo;

impl LanguageRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Language>, sqlx::Error> {
        let query = format!("SELECT {LANGUAGE_COLUMNS} FROM languages ORDER BY name");
        sqlx::query_as::<_, Language>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Language>, sqlx::Error> {
        let query = format!("SELECT {LANGUAGE_COLUMNS} FROM languages WHERE id = $1");
        sqlx::query_as::<_, Language>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateLanguage) -> Result<Language, sqlx::Error> {
        let query = format!(
            "INSERT INTO languages (code, name) VALUES ($1, $2) RETURNING {LANGUAGE_COLUMNS}"
        );
        sqlx::query_as::<_, Language>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}

/// Provides CRUD operations for book types.
pub struct BookTypeRepo;

impl BookTypeRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<BookType>, sqlx::Error> {
        let query = format!("SELECT {BOOK_TYPE_COLUMNS} FROM book_types ORDER BY name");
        sqlx::query_as::<_, BookType>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BookType>, sqlx::Error> {
        let query = format!("SELECT {BOOK_TYPE_COLUMNS} FROM book_types WHERE id = $1");
        sqlx::query_as::<_, BookType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateBookType) -> Result<BookType, sqlx::Error> {
        let query = format!(
            "INSERT INTO book_types (name, description) VALUES ($1, $2)
             RETURNING {BOOK_TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, BookType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }
}

/// Provides CRUD operations for level-1 categories.
pub struct CategoryL1Repo;

impl CategoryL1Repo {
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryL1>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_L1_COLUMNS} FROM categories_l1 ORDER BY name");
        sqlx::query_as::<_, CategoryL1>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CategoryL1>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_L1_COLUMNS} FROM categories_l1 WHERE id = $1");
        sqlx::query_as::<_, CategoryL1>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<CategoryL1, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories_l1 (name, description) VALUES ($1, $2)
             RETURNING {CATEGORY_L1_COLUMNS}"
        );
        sqlx::query_as::<_, CategoryL1>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }
}

/// Provides CRUD operations for level-2 categories, which live under a
/// level-1 parent and are unique only within it.
pub struct CategoryL2Repo;

impl CategoryL2Repo {
    pub async fn list_by_parent(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<CategoryL2>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_L2_COLUMNS} FROM categories_l2 WHERE parent_id = $1 ORDER BY name"
        );
        sqlx::query_as::<_, CategoryL2>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CategoryL2>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_L2_COLUMNS} FROM categories_l2 WHERE id = $1");
        sqlx::query_as::<_, CategoryL2>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        parent_id: DbId,
        input: &CreateCategory,
    ) -> Result<CategoryL2, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories_l2 (name, description, parent_id) VALUES ($1, $2, $3)
             RETURNING {CATEGORY_L2_COLUMNS}"
        );
        sqlx::query_as::<_, CategoryL2>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(parent_id)
            .fetch_one(pool)
            .await
    }
}

/// Provides CRUD operations for themes.
pub struct ThemeRepo;

impl ThemeRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!("SELECT {THEME_COLUMNS} FROM themes ORDER BY name");
        sqlx::query_as::<_, Theme>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {THEME_COLUMNS} FROM themes WHERE id = $1");
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateTheme) -> Result<Theme, sqlx::Error> {
        let query = format!(
            "INSERT INTO themes (name, description) VALUES ($1, $2) RETURNING {THEME_COLUMNS}"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }
}

/// Provides CRUD operations for target audiences.
pub struct AudienceRepo;

impl AudienceRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Audience>, sqlx::Error> {
        let query = format!("SELECT {AUDIENCE_COLUMNS} FROM audiences ORDER BY name");
        sqlx::query_as::<_, Audience>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Audience>, sqlx::Error> {
        let query = format!("SELECT {AUDIENCE_COLUMNS} FROM audiences WHERE id = $1");
        sqlx::query_as::<_, Audience>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateAudience) -> Result<Audience, sqlx::Error> {
        let query = format!(
            "INSERT INTO audiences (name, age_range) VALUES ($1, $2)
             RETURNING {AUDIENCE_COLUMNS}"
        );
        sqlx::query_as::<_, Audience>(&query)
            .bind(&input.name)
            .bind(&input.age_range)
            .fetch_one(pool)
            .await
    }
}

/// Provides CRUD operations for reading levels.
pub struct ReadingLevelRepo;

impl ReadingLevelRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ReadingLevel>, sqlx::Error> {
        let query = format!("SELECT {READING_LEVEL_COLUMNS} FROM reading_levels ORDER BY level");
        sqlx::query_as::<_, ReadingLevel>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReadingLevel>, sqlx::Error> {
        let query = format!("SELECT {READING_LEVEL_COLUMNS} FROM reading_levels WHERE id = $1");
        sqlx::query_as::<_, ReadingLevel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateReadingLevel,
    ) -> Result<ReadingLevel, sqlx::Error> {
        let query = format!(
            "INSERT INTO reading_levels (level, description) VALUES ($1, $2)
             RETURNING {READING_LEVEL_COLUMNS}"
        );
        sqlx::query_as::<_, ReadingLevel>(&query)
            .bind(&input.level)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }
}
