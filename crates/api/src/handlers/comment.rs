//! Handlers for comments. Same ownership rule as ratings, no aggregate.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bouquin_core::error::CoreError;
use bouquin_core::pagination::PageParams;
use bouquin_core::rating::validate_comment_content;
use bouquin_core::roles;
use bouquin_core::types::DbId;
use bouquin_db::models::comment::{Comment, CreateComment, UpdateComment};
use bouquin_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::book::ensure_book_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a comment or fail with NotFound.
async fn load_comment(pool: &sqlx::PgPool, id: DbId) -> AppResult<Comment> {
    CommentRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Comment", id }))
}

/// Enforce the author-or-admin rule for comment mutation.
fn ensure_can_modify(comment: &Comment, user: &AuthUser) -> AppResult<()> {
    if roles::can_modify(comment.user_id, user.user_id, &user.role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the comment's author or an admin may modify it".into(),
        )))
    }
}

/// POST /books/{id}/comments
///
/// Post a comment on a book.
pub async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_comment_content(&input.content).map_err(AppError::Core)?;
    ensure_book_exists(&state.pool, book_id).await?;

    let comment = CommentRepo::create(&state.pool, book_id, user.user_id, &input.content).await?;

    tracing::info!(
        user_id = user.user_id,
        book_id = book_id,
        comment_id = comment.id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /books/{id}/comments
///
/// Page through a book's comments, newest first. Public.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    ensure_book_exists(&state.pool, book_id).await?;

    let comments = CommentRepo::list_by_book(&state.pool, book_id, page).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// PUT /comments/{id}
///
/// Edit a comment's content. Author or admin only.
pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    let comment = load_comment(&state.pool, id).await?;
    ensure_can_modify(&comment, &user)?;

    if let Some(ref content) = patch.content {
        validate_comment_content(content).map_err(AppError::Core)?;
    }

    let updated = CommentRepo::update(&state.pool, id, patch.content.as_deref())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Comment", id }))?;

    tracing::info!(user_id = user.user_id, comment_id = id, "Comment updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /comments/{id}
///
/// Delete a comment. Author or admin only.
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let comment = load_comment(&state.pool, id).await?;
    ensure_can_modify(&comment, &user)?;

    CommentRepo::delete(&state.pool, id).await?;

    tracing::info!(user_id = user.user_id, comment_id = id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
