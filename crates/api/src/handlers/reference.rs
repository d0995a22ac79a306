//! Handlers for the reference catalog: languages, book types, categories,
//! themes, audiences, reading levels, and authors.
//!
//! Listings are public; creation is admin-only (authors are also created
//! implicitly through book creation's inline author path).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bouquin_core::error::CoreError;
use bouquin_core::types::DbId;
use bouquin_db::models::author::CreateAuthor;
use bouquin_db::models::reference::{
    CreateAudience, CreateBookType, CreateCategory, CreateLanguage, CreateReadingLevel,
    CreateTheme,
};
use bouquin_db::repositories::{
    AudienceRepo, AuthorRepo, BookTypeRepo, CategoryL1Repo, CategoryL2Repo, LanguageRepo,
    ReadingLevelRepo, ThemeRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Languages
-------------------------------------------------------------------------- */

/// GET /catalog/languages
pub async fn list_languages(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let languages = LanguageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: languages }))
}

/// POST /catalog/languages
pub async fn create_language(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateLanguage>,
) -> AppResult<impl IntoResponse> {
    let language = LanguageRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, language_id = language.id, "Language created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: language })))
}

/* --------------------------------------------------------------------------
Book types
-------------------------------------------------------------------------- */

/// GET /catalog/book-types
pub async fn list_book_types(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let types = BookTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// POST /catalog/book-types
pub async fn create_book_type(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBookType>,
) -> AppResult<impl IntoResponse> {
    let book_type = BookTypeRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, book_type_id = book_type.id, "Book type created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: book_type })))
}

/* --------------------------------------------------------------------------
Categories
-------------------------------------------------------------------------- */

/// GET /catalog/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryL1Repo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /catalog/categories
pub async fn create_category(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryL1Repo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /catalog/categories/{id}/children
///
/// Level-2 categories under one level-1 parent.
pub async fn list_child_categories(
    State(state): State<AppState>,
    Path(parent_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_parent_category_exists(&state.pool, parent_id).await?;
    let categories = CategoryL2Repo::list_by_parent(&state.pool, parent_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /catalog/categories/{id}/children
pub async fn create_child_category(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(parent_id): Path<DbId>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    ensure_parent_category_exists(&state.pool, parent_id).await?;
    let category = CategoryL2Repo::create(&state.pool, parent_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        category_id = category.id,
        parent_id = parent_id,
        "Child category created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

async fn ensure_parent_category_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    CategoryL1Repo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        })
    })?;
    Ok(())
}

/* --------------------------------------------------------------------------
Themes
-------------------------------------------------------------------------- */

/// GET /catalog/themes
pub async fn list_themes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let themes = ThemeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: themes }))
}

/// POST /catalog/themes
pub async fn create_theme(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTheme>,
) -> AppResult<impl IntoResponse> {
    let theme = ThemeRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, theme_id = theme.id, "Theme created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: theme })))
}

/* --------------------------------------------------------------------------
Audiences
-------------------------------------------------------------------------- */

/// GET /catalog/audiences
pub async fn list_audiences(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let audiences = AudienceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: audiences }))
}

/// POST /catalog/audiences
pub async fn create_audience(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAudience>,
) -> AppResult<impl IntoResponse> {
    let audience = AudienceRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, audience_id = audience.id, "Audience created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: audience })))
}

/* --------------------------------------------------------------------------
Reading levels
-------------------------------------------------------------------------- */

/// GET /catalog/reading-levels
pub async fn list_reading_levels(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let levels = ReadingLevelRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: levels }))
}

/// POST /catalog/reading-levels
pub async fn create_reading_level(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateReadingLevel>,
) -> AppResult<impl IntoResponse> {
    let level = ReadingLevelRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, reading_level_id = level.id, "Reading level created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: level })))
}

/* --------------------------------------------------------------------------
Authors
-------------------------------------------------------------------------- */

/// GET /authors
pub async fn list_authors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let authors = AuthorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: authors }))
}

/// POST /authors
pub async fn create_author(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAuthor>,
) -> AppResult<impl IntoResponse> {
    let author = AuthorRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, author_id = author.id, "Author created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: author })))
}
