//! Integration tests for the comment store: creation with author join,
//! newest-first pagination, patch semantics, and deletion.

use bouquin_core::catalog::{BookVariant, FileFormat};
use bouquin_core::pagination::PageParams;
use bouquin_db::models::author::CreateAuthor;
use bouquin_db::models::book::{Book, BookDraft};
use bouquin_db::models::reference::{
    CreateAudience, CreateBookType, CreateCategory, CreateLanguage, CreateReadingLevel,
};
use bouquin_db::models::user::CreateUser;
use bouquin_db::repositories::{
    AudienceRepo, AuthorRepo, BookRepo, BookTypeRepo, CategoryL1Repo, CommentRepo, LanguageRepo,
    ReadingLevelRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_book(pool: &PgPool) -> (Book, i64) {
    let language = LanguageRepo::create(
        pool,
        &CreateLanguage {
            code: "en".to_string(),
            name: "English".to_string(),
        },
    )
    .await
    .unwrap();
    let book_type = BookTypeRepo::create(
        pool,
        &CreateBookType {
            name: "Novel".to_string(),
            description: "Long-form fiction".to_string(),
        },
    )
    .await
    .unwrap();
    let category = CategoryL1Repo::create(
        pool,
        &CreateCategory {
            name: "Fiction".to_string(),
            description: "Invented stories".to_string(),
        },
    )
    .await
    .unwrap();
    let audience = AudienceRepo::create(
        pool,
        &CreateAudience {
            name: "Adults".to_string(),
            age_range: "18+".to_string(),
        },
    )
    .await
    .unwrap();
    let level = ReadingLevelRepo::create(
        pool,
        &CreateReadingLevel {
            level: "Advanced".to_string(),
            description: "Confident readers".to_string(),
        },
    )
    .await
    .unwrap();
    let author = AuthorRepo::create(
        pool,
        &CreateAuthor {
            first_name: "Iris".to_string(),
            last_name: "Valade".to_string(),
            bio: None,
        },
    )
    .await
    .unwrap();
    let publisher = UserRepo::create(
        pool,
        &CreateUser {
            email: "pub@example.com".to_string(),
            password_hash: "$argon2id$test-hash".to_string(),
            first_name: "Pub".to_string(),
            last_name: "Lisher".to_string(),
            role: "publisher".to_string(),
            bio: None,
            institution_name: None,
        },
    )
    .await
    .unwrap()
    .id;

    let reader = UserRepo::create(
        pool,
        &CreateUser {
            email: "reader@example.com".to_string(),
            password_hash: "$argon2id$test-hash".to_string(),
            first_name: "Rita".to_string(),
            last_name: "Morel".to_string(),
            role: "reader".to_string(),
            bio: None,
            institution_name: None,
        },
    )
    .await
    .unwrap()
    .id;

    let draft = BookDraft {
        title: "Commented Upon".to_string(),
        description: "A book with opinions attached.".to_string(),
        price: 8.0,
        is_free: false,
        cover_path: None,
        language_id: language.id,
        book_type_id: book_type.id,
        category_l1_ids: vec![category.id],
        category_l2_ids: vec![],
        theme_ids: vec![],
        audience_id: audience.id,
        reading_level_id: level.id,
        variant: BookVariant::Digital {
            file_format: FileFormat::Epub,
            file_path: "/files/c.epub".to_string(),
        },
    };
    let book = BookRepo::create(pool, publisher, &draft, &[author.id])
        .await
        .unwrap();

    (book, reader)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_joins_author_name(pool: PgPool) {
    let (book, reader) = seed_book(&pool).await;

    let comment = CommentRepo::create(&pool, book.id, reader, "Couldn't put it down.")
        .await
        .unwrap();

    assert_eq!(comment.book_id, book.id);
    assert_eq!(comment.user_id, reader);
    assert_eq!(comment.content, "Couldn't put it down.");
    assert_eq!(comment.user_first_name, "Rita");
    assert_eq!(comment.user_last_name, "Morel");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_newest_first_and_paginated(pool: PgPool) {
    let (book, reader) = seed_book(&pool).await;

    for i in 0..7 {
        CommentRepo::create(&pool, book.id, reader, &format!("comment {i}"))
            .await
            .unwrap();
        // Distinct created_at values so the ordering is deterministic.
        sqlx::query(
            "UPDATE comments SET created_at = now() - make_interval(mins => $1)
             WHERE content = $2",
        )
        .bind(7 - i)
        .bind(format!("comment {i}"))
        .execute(&pool)
        .await
        .unwrap();
    }

    let page = CommentRepo::list_by_book(
        &pool,
        book.id,
        PageParams {
            page: Some(1),
            size: Some(3),
        },
    )
    .await
    .unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_count, 7);
    assert_eq!(page.total_pages, 3);
    // Newest first: the smallest age offset comes first.
    assert_eq!(page.items[0].content, "comment 6");
    assert_eq!(page.items[1].content, "comment 5");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_keeps_content_when_patch_empty(pool: PgPool) {
    let (book, reader) = seed_book(&pool).await;
    let comment = CommentRepo::create(&pool, book.id, reader, "First draft")
        .await
        .unwrap();

    let untouched = CommentRepo::update(&pool, comment.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.content, "First draft");

    let revised = CommentRepo::update(&pool, comment.id, Some("Second thoughts"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(revised.content, "Second thoughts");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_returns_none(pool: PgPool) {
    let result = CommentRepo::update(&pool, 999_999, Some("ghost")).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_removes_comment(pool: PgPool) {
    let (book, reader) = seed_book(&pool).await;
    let comment = CommentRepo::create(&pool, book.id, reader, "Fleeting")
        .await
        .unwrap();

    CommentRepo::delete(&pool, comment.id).await.unwrap();
    assert!(CommentRepo::find_by_id(&pool, comment.id)
        .await
        .unwrap()
        .is_none());
}
