//! Integration tests for the reference catalog: natural-key uniqueness,
//! parent-scoped uniqueness of level-2 categories, and lookups.

use bouquin_db::models::reference::{
    CreateAudience, CreateBookType, CreateCategory, CreateLanguage, CreateReadingLevel,
    CreateTheme,
};
use bouquin_db::repositories::{
    AudienceRepo, BookTypeRepo, CategoryL1Repo, CategoryL2Repo, LanguageRepo, ReadingLevelRepo,
    ThemeRepo,
};
use sqlx::PgPool;

fn category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: format!("About {name}"),
    }
}

// ---------------------------------------------------------------------------
// Test: Natural-key uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_language_code_rejected(pool: PgPool) {
    LanguageRepo::create(
        &pool,
        &CreateLanguage {
            code: "de".to_string(),
            name: "German".to_string(),
        },
    )
    .await
    .unwrap();

    let duplicate_code = LanguageRepo::create(
        &pool,
        &CreateLanguage {
            code: "de".to_string(),
            name: "Deutsch".to_string(),
        },
    )
    .await;
    assert!(duplicate_code.is_err(), "duplicate language code should fail");

    let duplicate_name = LanguageRepo::create(
        &pool,
        &CreateLanguage {
            code: "de-AT".to_string(),
            name: "German".to_string(),
        },
    )
    .await;
    assert!(duplicate_name.is_err(), "duplicate language name should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_theme_name_rejected(pool: PgPool) {
    ThemeRepo::create(
        &pool,
        &CreateTheme {
            name: "Memory".to_string(),
            description: "Remembering and forgetting".to_string(),
        },
    )
    .await
    .unwrap();

    let result = ThemeRepo::create(
        &pool,
        &CreateTheme {
            name: "Memory".to_string(),
            description: "Again".to_string(),
        },
    )
    .await;
    assert!(result.is_err(), "duplicate theme name should fail");
}

// ---------------------------------------------------------------------------
// Test: Level-2 categories are unique only within their parent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_child_category_unique_within_parent_only(pool: PgPool) {
    let fiction = CategoryL1Repo::create(&pool, &category("Fiction")).await.unwrap();
    let nonfiction = CategoryL1Repo::create(&pool, &category("Nonfiction")).await.unwrap();

    CategoryL2Repo::create(&pool, fiction.id, &category("Short Stories"))
        .await
        .unwrap();

    // Same name under the same parent: rejected.
    let same_parent = CategoryL2Repo::create(&pool, fiction.id, &category("Short Stories")).await;
    assert!(same_parent.is_err(), "duplicate name within one parent should fail");

    // Same name under a different parent: allowed.
    let other_parent = CategoryL2Repo::create(&pool, nonfiction.id, &category("Short Stories"))
        .await
        .unwrap();
    assert_eq!(other_parent.name, "Short Stories");
    assert_eq!(other_parent.parent_id, nonfiction.id);

    let fiction_children = CategoryL2Repo::list_by_parent(&pool, fiction.id).await.unwrap();
    assert_eq!(fiction_children.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: Lookups round-trip and misses return None
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_id_round_trips(pool: PgPool) {
    let book_type = BookTypeRepo::create(
        &pool,
        &CreateBookType {
            name: "Anthology".to_string(),
            description: "Collected works".to_string(),
        },
    )
    .await
    .unwrap();
    let audience = AudienceRepo::create(
        &pool,
        &CreateAudience {
            name: "Young Adults".to_string(),
            age_range: "12-18".to_string(),
        },
    )
    .await
    .unwrap();
    let level = ReadingLevelRepo::create(
        &pool,
        &CreateReadingLevel {
            level: "Beginner".to_string(),
            description: "New readers".to_string(),
        },
    )
    .await
    .unwrap();
    let parent = CategoryL1Repo::create(&pool, &category("Science")).await.unwrap();
    let child = CategoryL2Repo::create(&pool, parent.id, &category("Astronomy"))
        .await
        .unwrap();
    let theme = ThemeRepo::create(
        &pool,
        &CreateTheme {
            name: "Discovery".to_string(),
            description: "Finding the new".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        BookTypeRepo::find_by_id(&pool, book_type.id).await.unwrap().unwrap().name,
        "Anthology"
    );
    assert_eq!(
        AudienceRepo::find_by_id(&pool, audience.id).await.unwrap().unwrap().age_range,
        "12-18"
    );
    assert_eq!(
        ReadingLevelRepo::find_by_id(&pool, level.id).await.unwrap().unwrap().level,
        "Beginner"
    );
    assert_eq!(
        CategoryL2Repo::find_by_id(&pool, child.id).await.unwrap().unwrap().parent_id,
        parent.id
    );
    assert_eq!(
        ThemeRepo::find_by_id(&pool, theme.id).await.unwrap().unwrap().name,
        "Discovery"
    );

    assert!(ThemeRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
    assert!(LanguageRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: Listings are name-ordered
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listings_are_name_ordered(pool: PgPool) {
    for name in ["Zoology", "Art", "Maps"] {
        CategoryL1Repo::create(&pool, &category(name)).await.unwrap();
    }

    let listed = CategoryL1Repo::list(&pool).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Art", "Maps", "Zoology"]);
}
