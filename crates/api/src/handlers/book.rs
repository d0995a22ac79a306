//! Handlers for the book catalog: creation, listing with compound filters,
//! mutation under the owner-or-admin rule, publication toggling, and the
//! popularity counter.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use bouquin_core::catalog;
use bouquin_core::error::CoreError;
use bouquin_core::pagination::PageParams;
use bouquin_core::roles;
use bouquin_core::types::DbId;
use bouquin_db::models::author::AuthorRef;
use bouquin_db::models::book::{Book, BookQuery, CreateBook, UpdateBook};
use bouquin_db::repositories::{AuthorRepo, BookQueryRepo, BookRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireBookCreator};
use crate::query::{LimitParams, DEFAULT_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Load a book or fail with NotFound.
pub(crate) async fn load_book(pool: &sqlx::PgPool, id: DbId) -> AppResult<Book> {
    BookRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Book", id }))
}

/// Verify that a book exists, returning an error if not found.
pub(crate) async fn ensure_book_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    load_book(pool, id).await?;
    Ok(())
}

/// Enforce the owner-or-admin rule for book mutation.
fn ensure_can_modify(book: &Book, user: &AuthUser) -> AppResult<()> {
    if roles::can_modify(book.publisher_id, user.user_id, &user.role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the book's publisher or an admin may modify it".into(),
        )))
    }
}

/// Resolve each author reference to a canonical id: existing ids must
/// exist, inline records are matched by exact name and created if absent
/// (idempotent, never a duplicate on repeated identical input).
async fn resolve_author_refs(
    pool: &sqlx::PgPool,
    refs: &[AuthorRef],
) -> AppResult<Vec<DbId>> {
    let mut ids = Vec::with_capacity(refs.len());
    for author_ref in refs {
        match author_ref {
            AuthorRef::Id(id) => {
                AuthorRepo::find_by_id(pool, *id).await?.ok_or_else(|| {
                    AppError::Core(CoreError::NotFound {
                        entity: "Author",
                        id: *id,
                    })
                })?;
                ids.push(*id);
            }
            AuthorRef::New(input) => {
                let author = AuthorRepo::find_or_create(pool, input).await?;
                ids.push(author.id);
            }
        }
    }
    Ok(ids)
}

/* --------------------------------------------------------------------------
Catalog handlers
-------------------------------------------------------------------------- */

/// POST /books
///
/// Create a book. Writer or publisher only; the creating user becomes the
/// owner and the book starts unpublished.
pub async fn create_book(
    RequireBookCreator(user): RequireBookCreator,
    State(state): State<AppState>,
    Json(input): Json<CreateBook>,
) -> AppResult<impl IntoResponse> {
    let draft = input.validate().map_err(AppError::Core)?;
    let author_ids = resolve_author_refs(&state.pool, &input.authors).await?;

    let book = BookRepo::create(&state.pool, user.user_id, &draft, &author_ids).await?;

    tracing::info!(
        user_id = user.user_id,
        book_id = book.id,
        title = %book.title,
        kind = %draft.variant.kind(),
        "Book created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// GET /books
///
/// List books with compound filters, sorting, and pagination. Public.
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BookQuery>,
) -> AppResult<impl IntoResponse> {
    let sort = catalog::parse_sort(params.sort.as_deref()).map_err(AppError::Core)?;
    let page = BookQueryRepo::list(&state.pool, &params, sort).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /books/{id}
///
/// A single book with joined reference data and nested comments and
/// ratings. Public.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let details = BookRepo::find_details(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Book", id }))?;
    Ok(Json(DataResponse { data: details }))
}

/// PUT /books/{id}
///
/// Patch a book. Owner or admin only; absent fields keep their value and
/// the variant discriminator cannot change.
pub async fn update_book(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateBook>,
) -> AppResult<impl IntoResponse> {
    let book = load_book(&state.pool, id).await?;
    ensure_can_modify(&book, &user)?;
    patch.validate().map_err(AppError::Core)?;

    let updated = BookRepo::update(&state.pool, id, &patch, book.variant.kind())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Book", id }))?;

    tracing::info!(user_id = user.user_id, book_id = id, "Book updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /books/{id}
///
/// Delete a book. Owner or admin only; ratings and comments cascade away.
pub async fn delete_book(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = load_book(&state.pool, id).await?;
    ensure_can_modify(&book, &user)?;

    BookRepo::delete(&state.pool, id).await?;

    tracing::info!(user_id = user.user_id, book_id = id, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Publication and popularity
-------------------------------------------------------------------------- */

/// Response payload for the publication toggle.
#[derive(Debug, Serialize)]
pub struct PublicationResponse {
    pub id: DbId,
    pub title: String,
    pub is_published: bool,
    pub message: String,
}

/// PUT /books/{id}/publication
///
/// Flip the publication flag. Admin only.
pub async fn toggle_publication(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let status = BookRepo::toggle_publication(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Book", id }))?;

    let message = format!(
        "Book \"{}\" is now {}",
        status.title,
        if status.is_published {
            "published"
        } else {
            "unpublished"
        }
    );

    tracing::info!(
        user_id = user.user_id,
        book_id = id,
        is_published = status.is_published,
        "Publication status toggled"
    );

    Ok(Json(DataResponse {
        data: PublicationResponse {
            id: status.id,
            title: status.title,
            is_published: status.is_published,
            message,
        },
    }))
}

/// Response payload for the popularity increment.
#[derive(Debug, Serialize)]
pub struct PopularityResponse {
    pub popularity: i64,
}

/// PUT /books/{id}/popularity
///
/// Atomically bump the popularity counter. Public; concurrent callers
/// cannot lose updates.
pub async fn increment_popularity(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let popularity = BookRepo::increment_popularity(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Book", id }))?;

    Ok(Json(DataResponse {
        data: PopularityResponse { popularity },
    }))
}

/* --------------------------------------------------------------------------
Listings
-------------------------------------------------------------------------- */

/// GET /books/mine
///
/// The authenticated user's own books, paginated.
pub async fn list_my_books(
    user: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let books = BookRepo::list_by_owner(&state.pool, user.user_id, page).await?;
    Ok(Json(DataResponse { data: books }))
}

/// GET /books/popular
///
/// The most popular published books. Public.
pub async fn list_popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let books =
        BookRepo::list_most_popular(&state.pool, params.limit.unwrap_or(DEFAULT_LIMIT)).await?;
    Ok(Json(DataResponse { data: books }))
}
