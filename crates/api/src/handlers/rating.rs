//! Handlers for the rating subsystem.
//!
//! A user holds at most one rating per book; submit is an upsert and every
//! successful write returns the book's refreshed {average, count} pair.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bouquin_core::error::CoreError;
use bouquin_core::pagination::PageParams;
use bouquin_core::rating::validate_score;
use bouquin_core::roles;
use bouquin_core::types::DbId;
use bouquin_db::models::rating::SubmitRating;
use bouquin_db::repositories::RatingRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::book::ensure_book_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /books/{id}/ratings
///
/// Submit or update the caller's rating for a book. Responds 201 when a
/// new rating was created and 200 when an existing one was updated in
/// place, so callers can observe which path the upsert took.
pub async fn submit_rating(
    user: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Json(input): Json<SubmitRating>,
) -> AppResult<impl IntoResponse> {
    validate_score(input.score).map_err(AppError::Core)?;
    ensure_book_exists(&state.pool, book_id).await?;

    let submission = RatingRepo::submit(&state.pool, book_id, user.user_id, input.score).await?;

    tracing::info!(
        user_id = user.user_id,
        book_id = book_id,
        score = input.score,
        created = submission.created,
        average = submission.aggregate.average_rating,
        count = submission.aggregate.rating_count,
        "Rating submitted"
    );

    let status = if submission.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: submission })))
}

/// GET /books/{id}/ratings
///
/// Page through a book's ratings, newest first. Public.
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    ensure_book_exists(&state.pool, book_id).await?;

    let ratings = RatingRepo::list_by_book(&state.pool, book_id, page).await?;
    Ok(Json(DataResponse { data: ratings }))
}

/// GET /books/{id}/ratings/mine
///
/// The caller's own rating for a book, or 404 if they have not rated it.
pub async fn my_rating(
    user: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_book_exists(&state.pool, book_id).await?;

    let rating = RatingRepo::find_own(&state.pool, book_id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Rating for book",
                id: book_id,
            })
        })?;
    Ok(Json(DataResponse { data: rating }))
}

/// DELETE /ratings/{id}
///
/// Delete a rating. Author or admin only; the book's aggregate is
/// recomputed and returned.
pub async fn delete_rating(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rating = RatingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Rating", id }))?;

    if !roles::can_modify(rating.user_id, user.user_id, &user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the rating's author or an admin may delete it".into(),
        )));
    }

    let aggregate = RatingRepo::delete(&state.pool, rating.id, rating.book_id).await?;

    tracing::info!(
        user_id = user.user_id,
        rating_id = id,
        book_id = rating.book_id,
        average = aggregate.average_rating,
        count = aggregate.rating_count,
        "Rating deleted"
    );

    Ok(Json(DataResponse { data: aggregate }))
}
