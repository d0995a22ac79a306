//! Route definitions for the book catalog.
//!
//! ```text
//! GET    /                  list_books (public, filtered/paginated)
//! POST   /                  create_book (writer, publisher)
//! GET    /popular           list_popular (public)
//! GET    /mine              list_my_books (requires auth)
//! GET    /{id}              get_book (public, joined details)
//! PUT    /{id}              update_book (owner or admin)
//! DELETE /{id}              delete_book (owner or admin)
//! PUT    /{id}/publication  toggle_publication (admin)
//! PUT    /{id}/popularity   increment_popularity (public)
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::book;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(book::list_books).post(book::create_book))
        .route("/popular", get(book::list_popular))
        .route("/mine", get(book::list_my_books))
        .route(
            "/{id}",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        .route("/{id}/publication", put(book::toggle_publication))
        .route("/{id}/popularity", put(book::increment_popularity))
}
