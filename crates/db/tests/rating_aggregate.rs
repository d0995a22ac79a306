//! Integration tests for the rating aggregation engine.
//!
//! Exercises the invariant that after any rating write completes, a book's
//! {average_rating, rating_count} pair equals the values re-derived from
//! the full rating set: upsert-in-place semantics, deletion, randomized
//! submission sequences, and concurrent submissions against one book.

use bouquin_core::catalog::{BookVariant, FileFormat};
use bouquin_db::models::author::CreateAuthor;
use bouquin_db::models::book::{Book, BookDraft};
use bouquin_db::models::reference::{
    CreateAudience, CreateBookType, CreateCategory, CreateLanguage, CreateReadingLevel,
};
use bouquin_db::models::user::CreateUser;
use bouquin_db::repositories::{
    AudienceRepo, AuthorRepo, BookRepo, BookTypeRepo, CategoryL1Repo, LanguageRepo, RatingRepo,
    ReadingLevelRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Refs {
    language_id: i64,
    book_type_id: i64,
    category_id: i64,
    audience_id: i64,
    reading_level_id: i64,
    author_id: i64,
}

async fn seed_refs(pool: &PgPool) -> Refs {
    let language = LanguageRepo::create(
        pool,
        &CreateLanguage {
            code: "fr".to_string(),
            name: "French".to_string(),
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
            first_name: "Marie".to_string(),
            last_name: "Clermont".to_string(),
            bio: None,
        },
    )
    .await
    .unwrap();

    Refs {
        language_id: language.id,
        book_type_id: book_type.id,
        category_id: category.id,
        audience_id: audience.id,
        reading_level_id: level.id,
        author_id: author.id,
    }
}

async fn seed_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$test-hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: role.to_string(),
            bio: None,
            institution_name: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn digital_draft(refs: &Refs, title: &str) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        description: "A book under test.".to_string(),
        price: 10.0,
        is_free: false,
        cover_path: None,
        language_id: refs.language_id,
        book_type_id: refs.book_type_id,
        category_l1_ids: vec![refs.category_id],
        category_l2_ids: vec![],
        theme_ids: vec![],
        audience_id: refs.audience_id,
        reading_level_id: refs.reading_level_id,
        variant: BookVariant::Digital {
            file_format: FileFormat::Epub,
            file_path: "/files/test.epub".to_string(),
        },
    }
}

async fn seed_book(pool: &PgPool, publisher_id: i64, refs: &Refs, title: &str) -> Book {
    BookRepo::create(pool, publisher_id, &digital_draft(refs, title), &[refs.author_id])
        .await
        .unwrap()
}

/// Fetch the stored aggregate directly from the books table.
async fn stored_aggregate(pool: &PgPool, book_id: i64) -> (f64, i64) {
    let book = BookRepo::find_by_id(pool, book_id).await.unwrap().unwrap();
    (book.average_rating, book.rating_count)
}

/// Re-derive the aggregate from the rating rows, independently of the
/// repository's own recomputation.
async fn derived_aggregate(pool: &PgPool, book_id: i64) -> (f64, i64) {
    let (sum, count): (Option<i64>, i64) = sqlx::query_as(
        "SELECT SUM(score)::BIGINT, COUNT(*)::BIGINT FROM ratings WHERE book_id = $1",
    )
    .bind(book_id)
    .fetch_one(pool)
    .await
    .unwrap();

    if count == 0 {
        (0.0, 0)
    } else {
        (sum.unwrap() as f64 / count as f64, count)
    }
}

// ---------------------------------------------------------------------------
// Test: First submission creates, aggregate reflects it
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_rating_sets_aggregate(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let reader = seed_user(&pool, "reader@example.com", "reader").await;
    let book = seed_book(&pool, publisher, &refs, "Rated Once").await;

    assert_eq!(stored_aggregate(&pool, book.id).await, (0.0, 0));

    let submission = RatingRepo::submit(&pool, book.id, reader, 4).await.unwrap();
    assert!(submission.created, "first submission must report created");
    assert_eq!(submission.rating.score, 4);
    assert_eq!(submission.aggregate.average_rating, 4.0);
    assert_eq!(submission.aggregate.rating_count, 1);

    assert_eq!(stored_aggregate(&pool, book.id).await, (4.0, 1));
}

// ---------------------------------------------------------------------------
// Test: Resubmission updates in place, never appends
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resubmission_updates_in_place(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let reader = seed_user(&pool, "reader@example.com", "reader").await;
    let book = seed_book(&pool, publisher, &refs, "Rated Twice").await;

    let first = RatingRepo::submit(&pool, book.id, reader, 2).await.unwrap();
    let second = RatingRepo::submit(&pool, book.id, reader, 5).await.unwrap();

    assert!(first.created);
    assert!(!second.created, "resubmission must report an update");
    assert_eq!(
        first.rating.id, second.rating.id,
        "the same row must be updated in place"
    );

    // Exactly one stored rating, equal to the latest score.
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::BIGINT FROM ratings WHERE book_id = $1 AND user_id = $2",
    )
    .bind(book.id)
    .bind(reader)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    let own = RatingRepo::find_own(&pool, book.id, reader)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(own.score, 5);
    assert_eq!(stored_aggregate(&pool, book.id).await, (5.0, 1));
}

// ---------------------------------------------------------------------------
// Test: The worked scenario from the design discussion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_then_delete_scenario(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let user_a = seed_user(&pool, "a@example.com", "reader").await;
    let user_b = seed_user(&pool, "b@example.com", "reader").await;
    let book = seed_book(&pool, publisher, &refs, "Scenario").await;

    // {A: 4, B: 2} -> average 3.0, count 2.
    RatingRepo::submit(&pool, book.id, user_a, 4).await.unwrap();
    RatingRepo::submit(&pool, book.id, user_b, 2).await.unwrap();
    assert_eq!(stored_aggregate(&pool, book.id).await, (3.0, 2));

    // A resubmits 5 -> (5 + 2) / 2 = 3.5, count stays 2.
    let resubmit = RatingRepo::submit(&pool, book.id, user_a, 5).await.unwrap();
    assert!(!resubmit.created);
    assert_eq!(resubmit.aggregate.average_rating, 3.5);
    assert_eq!(resubmit.aggregate.rating_count, 2);

    // B's rating is deleted -> 5 / 1 = 5.0, count 1.
    let b_rating = RatingRepo::find_own(&pool, book.id, user_b)
        .await
        .unwrap()
        .unwrap();
    let aggregate = RatingRepo::delete(&pool, b_rating.id, book.id).await.unwrap();
    assert_eq!(aggregate.average_rating, 5.0);
    assert_eq!(aggregate.rating_count, 1);
    assert_eq!(stored_aggregate(&pool, book.id).await, (5.0, 1));
}

// ---------------------------------------------------------------------------
// Test: Deleting the only rating resets the aggregate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_only_rating_resets_aggregate(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let reader = seed_user(&pool, "reader@example.com", "reader").await;
    let book = seed_book(&pool, publisher, &refs, "Briefly Rated").await;

    let submission = RatingRepo::submit(&pool, book.id, reader, 3).await.unwrap();
    let aggregate = RatingRepo::delete(&pool, submission.rating.id, book.id)
        .await
        .unwrap();

    assert_eq!(aggregate.average_rating, 0.0);
    assert_eq!(aggregate.rating_count, 0);
    assert_eq!(stored_aggregate(&pool, book.id).await, (0.0, 0));
}

// ---------------------------------------------------------------------------
// Test: Randomized submission sequences keep the invariant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_randomized_sequences_keep_invariant(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let book = seed_book(&pool, publisher, &refs, "Fuzzed").await;

    let mut users = Vec::new();
    for i in 0..6 {
        users.push(seed_user(&pool, &format!("u{i}@example.com"), "reader").await);
    }

    // Deterministic pseudo-random sequence (LCG) of (user, score) pairs,
    // with plenty of repeated users so the upsert path is exercised.
    let mut state: u64 = 0x3FD6_9E2A;
    for step in 0..40 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let user = users[(state >> 33) as usize % users.len()];
        let score = ((state >> 17) % 5) as i32 + 1;

        let submission = RatingRepo::submit(&pool, book.id, user, score).await.unwrap();

        let (expected_avg, expected_count) = derived_aggregate(&pool, book.id).await;
        assert_eq!(
            submission.aggregate.rating_count, expected_count,
            "count diverged at step {step}"
        );
        assert!(
            (submission.aggregate.average_rating - expected_avg).abs() < 1e-9,
            "average diverged at step {step}: {} vs {expected_avg}",
            submission.aggregate.average_rating
        );
    }

    // Never more ratings than users.
    let (_, count) = stored_aggregate(&pool, book.id).await;
    assert!(count <= users.len() as i64);
}

// ---------------------------------------------------------------------------
// Test: Concurrent submissions leave a consistent aggregate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_submissions_consistent(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let book = seed_book(&pool, publisher, &refs, "Contended").await;

    let mut users = Vec::new();
    for i in 0..8 {
        users.push(seed_user(&pool, &format!("c{i}@example.com"), "reader").await);
    }

    // Every user submits a known score concurrently. Scores 1..=5 cycling.
    let mut handles = Vec::new();
    for (i, &user) in users.iter().enumerate() {
        let pool = pool.clone();
        let book_id = book.id;
        let score = (i % 5) as i32 + 1;
        handles.push(tokio::spawn(async move {
            RatingRepo::submit(&pool, book_id, user, score).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (stored_avg, stored_count) = stored_aggregate(&pool, book.id).await;
    let (expected_avg, expected_count) = derived_aggregate(&pool, book.id).await;

    assert_eq!(stored_count, users.len() as i64);
    assert_eq!(stored_count, expected_count);
    assert!(
        (stored_avg - expected_avg).abs() < 1e-9,
        "aggregate must match the rating set after concurrent writes"
    );
}

// ---------------------------------------------------------------------------
// Test: Ratings listing is paginated newest-first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_book_paginates(pool: PgPool) {
    let refs = seed_refs(&pool).await;
    let publisher = seed_user(&pool, "pub@example.com", "publisher").await;
    let book = seed_book(&pool, publisher, &refs, "Listed").await;

    for i in 0..7 {
        let user = seed_user(&pool, &format!("r{i}@example.com"), "reader").await;
        RatingRepo::submit(&pool, book.id, user, (i % 5) as i32 + 1)
            .await
            .unwrap();
    }

    let page = RatingRepo::list_by_book(
        &pool,
        book.id,
        bouquin_core::pagination::PageParams {
            page: Some(2),
            size: Some(3),
        },
    )
    .await
    .unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_count, 7);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
}
