//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod author_repo;
pub mod book_query;
pub mod book_repo;
pub mod comment_repo;
pub mod rating_repo;
pub mod reference_repo;
pub mod user_repo;

pub use author_repo::AuthorRepo;
pub use book_query::BookQueryRepo;
pub use book_repo::BookRepo;
pub use comment_repo::CommentRepo;
pub use rating_repo::RatingRepo;
pub use reference_repo::{
    AudienceRepo, BookTypeRepo, CategoryL1Repo, CategoryL2Repo, LanguageRepo, ReadingLevelRepo,
    ThemeRepo,
};
pub use user_repo::UserRepo;
