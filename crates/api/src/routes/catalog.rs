//! Route definitions for the reference catalog.
//!
//! Listings are public; creation requires the admin role (enforced by the
//! `RequireAdmin` extractor on the handlers).

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Reference-entity routes, registered as `/catalog`.
///
/// ```text
/// GET/POST /languages                 list, create
/// GET/POST /book-types                list, create
/// GET/POST /categories                list, create (level 1)
/// GET/POST /categories/{id}/children  list, create (level 2)
/// GET/POST /themes                    list, create
/// GET/POST /audiences                 list, create
/// GET/POST /reading-levels            list, create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/languages",
            get(reference::list_languages).post(reference::create_language),
        )
        .route(
            "/book-types",
            get(reference::list_book_types).post(reference::create_book_type),
        )
        .route(
            "/categories",
            get(reference::list_categories).post(reference::create_category),
        )
        .route(
            "/categories/{id}/children",
            get(reference::list_child_categories).post(reference::create_child_category),
        )
        .route(
            "/themes",
            get(reference::list_themes).post(reference::create_theme),
        )
        .route(
            "/audiences",
            get(reference::list_audiences).post(reference::create_audience),
        )
        .route(
            "/reading-levels",
            get(reference::list_reading_levels).post(reference::create_reading_level),
        )
}

/// Author routes, registered as `/authors`.
///
/// ```text
/// GET  /   list_authors (public)
/// POST /   create_author (admin; authors are also created inline via book creation)
/// ```
pub fn authors_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(reference::list_authors).post(reference::create_author),
    )
}
