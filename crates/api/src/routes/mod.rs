//! Route tree assembly.

pub mod auth;
pub mod book;
pub mod catalog;
pub mod comment;
pub mod health;
pub mod rating;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/me                              current user
///
/// /books                                list (public), create (writer|publisher)
/// /books/popular                        most popular published books (public)
/// /books/mine                           own books (auth)
/// /books/{id}                           get (public), update, delete (owner|admin)
/// /books/{id}/publication               toggle publication (admin)
/// /books/{id}/popularity                atomic popularity increment (public)
/// /books/{id}/ratings                   list (public), submit-or-update (auth)
/// /books/{id}/ratings/mine              own rating (auth)
/// /books/{id}/comments                  list (public), create (auth)
///
/// /ratings/{id}                         delete (author|admin)
/// /comments/{id}                        update, delete (author|admin)
///
/// /catalog/*                            reference entities: list (public), create (admin)
/// /authors                              list (public), create (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest(
            "/books",
            book::router()
                .merge(rating::book_ratings_router())
                .merge(comment::book_comments_router()),
        )
        .nest("/ratings", rating::ratings_router())
        .nest("/comments", comment::comments_router())
        .nest("/catalog", catalog::router())
        .nest("/authors", catalog::authors_router())
}
