//! Route definitions for comments.
//!
//! Book-scoped routes are merged into the `/books` route group; direct
//! mutation is registered as a standalone `/comments` group.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Book-scoped comment routes, merged into `/books`.
///
/// ```text
/// GET  /{id}/comments  list_comments (public, paginated)
/// POST /{id}/comments  create_comment (requires auth)
/// ```
pub fn book_comments_router() -> Router<AppState> {
    Router::new().route(
        "/{id}/comments",
        get(comment::list_comments).post(comment::create_comment),
    )
}

/// Standalone comment routes, registered as `/comments`.
///
/// ```text
/// PUT    /{id}  update_comment (author or admin)
/// DELETE /{id}  delete_comment (author or admin)
/// ```
pub fn comments_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(comment::update_comment).delete(comment::delete_comment),
    )
}
