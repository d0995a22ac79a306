//! Route definitions for ratings.
//!
//! Book-scoped routes are merged into the `/books` route group; direct
//! rating deletion is registered as a standalone `/ratings` group.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::rating;
use crate::state::AppState;

/// Book-scoped rating routes, merged into `/books`.
///
/// ```text
/// GET  /{id}/ratings       list_ratings (public, paginated)
/// POST /{id}/ratings       submit_rating (requires auth; 201 create / 200 update)
/// GET  /{id}/ratings/mine  my_rating (requires auth)
/// ```
pub fn book_ratings_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/ratings",
            get(rating::list_ratings).post(rating::submit_rating),
        )
        .route("/{id}/ratings/mine", get(rating::my_rating))
}

/// Standalone rating routes, registered as `/ratings`.
///
/// ```text
/// DELETE /{id}  delete_rating (author or admin)
/// ```
pub fn ratings_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(rating::delete_rating))
}
