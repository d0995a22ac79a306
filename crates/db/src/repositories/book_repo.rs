//! Repository for the `books` table and its junction tables.

use bouquin_core::catalog::{BookKind, BookVariant};
use bouquin_core::pagination::{PageParams, Paged};
use bouquin_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::author::Author;
use crate::models::book::{Book, BookDetails, BookDraft, PublicationState, UpdateBook};
use crate::models::comment::CommentWithUser;
use crate::models::rating::RatingWithUser;
use crate::models::reference::{CategoryL1, CategoryL2, Theme};
use crate::repositories::reference_repo::{
    AudienceRepo, BookTypeRepo, LanguageRepo, ReadingLevelRepo,
};
use crate::repositories::user_repo::UserRepo;

/// Column list for books queries, shared with the filter engine.
pub(crate) const BOOK_COLUMNS: &str = "\
    id, title, description, price, is_free, date_published, is_published, \
    popularity, average_rating, rating_count, cover_path, publisher_id, \
    language_id, book_type_id, audience_id, reading_level_id, kind, \
    file_format, file_path, duration_minutes, narrator, audio_path, \
    created_at, updated_at";

/// Upper bound for the most-popular listing.
const MAX_POPULAR_LIMIT: i64 = 100;

/// Trim an optional patch value, treating blank strings as absent so a
/// PUT can never overwrite a required field with emptiness.
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Insert junction rows linking a book to a list of reference ids.
async fn link_rows(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    column: &str,
    book_id: DbId,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    for &id in ids {
        let query =
            format!("INSERT INTO {table} (book_id, {column}) VALUES ($1, $2) ON CONFLICT DO NOTHING");
        sqlx::query(&query)
            .bind(book_id)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Replace all junction rows for one relationship of a book.
async fn replace_rows(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    column: &str,
    book_id: DbId,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    let query = format!("DELETE FROM {table} WHERE book_id = $1");
    sqlx::query(&query).bind(book_id).execute(&mut **tx).await?;
    link_rows(tx, table, column, book_id, ids).await
}

/// Provides CRUD, publication, and popularity operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Persist a validated draft with its relationship rows in one
    /// transaction. The caller has already resolved author references to
    /// canonical ids.
    ///
    /// New books start unpublished with zero popularity and an empty
    /// rating aggregate.
    pub async fn create(
        pool: &PgPool,
        publisher_id: DbId,
        draft: &BookDraft,
        author_ids: &[DbId],
    ) -> Result<Book, sqlx::Error> {
        let (file_format, file_path, duration_minutes, narrator, audio_path) = match &draft.variant
        {
            BookVariant::Digital {
                file_format,
                file_path,
            } => (
                Some(file_format.as_str()),
                Some(file_path.as_str()),
                None,
                None,
                None,
            ),
            BookVariant::Audio {
                duration_minutes,
                narrator,
                audio_path,
            } => (
                None,
                None,
                Some(*duration_minutes),
                Some(narrator.as_str()),
                Some(audio_path.as_str()),
            ),
        };

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO books
                (title, description, price, is_free,
                 cover_path,
                 publisher_id, language_id, book_type_id, audience_id, reading_level_id,
                 kind, file_format, file_path, duration_minutes, narrator, audio_path)
             VALUES ($1, $2, $3, $4,
                     COALESCE($5, '/images/covers/default.jpg'),
                     $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16)
             RETURNING {BOOK_COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.price)
            .bind(draft.is_free)
            .bind(&draft.cover_path)
            .bind(publisher_id)
            .bind(draft.language_id)
            .bind(draft.book_type_id)
            .bind(draft.audience_id)
            .bind(draft.reading_level_id)
            .bind(draft.variant.kind().as_str())
            .bind(file_format)
            .bind(file_path)
            .bind(duration_minutes)
            .bind(narrator)
            .bind(audio_path)
            .fetch_one(&mut *tx)
            .await?;

        link_rows(&mut tx, "book_authors", "author_id", book.id, author_ids).await?;
        link_rows(
            &mut tx,
            "book_categories_l1",
            "category_id",
            book.id,
            &draft.category_l1_ids,
        )
        .await?;
        link_rows(
            &mut tx,
            "book_categories_l2",
            "category_id",
            book.id,
            &draft.category_l2_ids,
        )
        .await?;
        link_rows(&mut tx, "book_themes", "theme_id", book.id, &draft.theme_ids).await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Find a book by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a patch to a book in a single atomic write.
    ///
    /// Absent and blank fields keep their current value. `is_free = true`
    /// forces the price to zero even if the same patch carries a price.
    /// Variant fields are only applied when they match `kind`, the book's
    /// existing discriminator; mismatched ones are ignored. Relationship
    /// lists, when present, replace the existing junction rows in the same
    /// transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &UpdateBook,
        kind: BookKind,
    ) -> Result<Option<Book>, sqlx::Error> {
        let (is_free, price) = match patch.is_free {
            Some(true) => (Some(true), Some(0.0)),
            Some(false) => (Some(false), patch.price),
            None => (None, patch.price),
        };

        let (file_format, file_path, duration_minutes, narrator, audio_path) = match kind {
            BookKind::Digital => (
                non_blank(&patch.file_format),
                non_blank(&patch.file_path),
                None,
                None,
                None,
            ),
            BookKind::Audio => (
                None,
                None,
                patch.duration_minutes,
                non_blank(&patch.narrator),
                non_blank(&patch.audio_path),
            ),
        };

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE books SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                is_free = COALESCE($4, is_free),
                cover_path = COALESCE($5, cover_path),
                language_id = COALESCE($6, language_id),
                book_type_id = COALESCE($7, book_type_id),
                audience_id = COALESCE($8, audience_id),
                reading_level_id = COALESCE($9, reading_level_id),
                file_format = COALESCE($10, file_format),
                file_path = COALESCE($11, file_path),
                duration_minutes = COALESCE($12, duration_minutes),
                narrator = COALESCE($13, narrator),
                audio_path = COALESCE($14, audio_path),
                updated_at = now()
             WHERE id = $15
             RETURNING {BOOK_COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(non_blank(&patch.title))
            .bind(non_blank(&patch.description))
            .bind(price)
            .bind(is_free)
            .bind(non_blank(&patch.cover_path))
            .bind(patch.language_id)
            .bind(patch.book_type_id)
            .bind(patch.audience_id)
            .bind(patch.reading_level_id)
            .bind(file_format)
            .bind(file_path)
            .bind(duration_minutes)
            .bind(narrator)
            .bind(audio_path)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(book) = book else {
            return Ok(None);
        };

        if let Some(ids) = &patch.author_ids {
            replace_rows(&mut tx, "book_authors", "author_id", id, ids).await?;
        }
        if let Some(ids) = &patch.category_l1_ids {
            replace_rows(&mut tx, "book_categories_l1", "category_id", id, ids).await?;
        }
        if let Some(ids) = &patch.category_l2_ids {
            replace_rows(&mut tx, "book_categories_l2", "category_id", id, ids).await?;
        }
        if let Some(ids) = &patch.theme_ids {
            replace_rows(&mut tx, "book_themes", "theme_id", id, ids).await?;
        }

        tx.commit().await?;
        Ok(Some(book))
    }

    /// Delete a book. Ratings, comments, and junction rows cascade away
    /// with it. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the publication flag, returning the new state.
    pub async fn toggle_publication(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PublicationState>, sqlx::Error> {
        sqlx::query_as::<_, PublicationState>(
            "UPDATE books SET is_published = NOT is_published, updated_at = now()
             WHERE id = $1
             RETURNING id, title, is_published",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Atomically bump the popularity counter, returning the new value.
    /// The increment happens in the store so concurrent callers cannot
    /// lose updates.
    pub async fn increment_popularity(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE books SET popularity = popularity + 1 WHERE id = $1 RETURNING popularity",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Page through one publisher's books, newest publication first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        page: PageParams,
    ) -> Result<Paged<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE publisher_id = $1
             ORDER BY date_published DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Book>(&query)
            .bind(owner_id)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM books WHERE publisher_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(Paged::new(items, page, total))
    }

    /// The most popular published books, ordered by popularity then
    /// average rating.
    pub async fn list_most_popular(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE is_published = TRUE
             ORDER BY popularity DESC, average_rating DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(limit.clamp(1, MAX_POPULAR_LIMIT))
            .fetch_all(pool)
            .await
    }

    /// A book with its joined reference data and nested comments and
    /// ratings, as served by the get-by-id endpoint.
    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookDetails>, sqlx::Error> {
        let Some(book) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let authors = sqlx::query_as::<_, Author>(
            "SELECT a.id, a.first_name, a.last_name, a.bio, a.created_at, a.updated_at
             FROM authors a
             INNER JOIN book_authors ba ON ba.author_id = a.id
             WHERE ba.book_id = $1
             ORDER BY a.last_name, a.first_name",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        // The NOT NULL foreign keys guarantee these lookups hit.
        let publisher = UserRepo::find_summary(pool, book.publisher_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let language = LanguageRepo::find_by_id(pool, book.language_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let book_type = BookTypeRepo::find_by_id(pool, book.book_type_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let audience = AudienceRepo::find_by_id(pool, book.audience_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let reading_level = ReadingLevelRepo::find_by_id(pool, book.reading_level_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let categories_l1 = sqlx::query_as::<_, CategoryL1>(
            "SELECT c.id, c.name, c.description, c.created_at
             FROM categories_l1 c
             INNER JOIN book_categories_l1 bc ON bc.category_id = c.id
             WHERE bc.book_id = $1
             ORDER BY c.name",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let categories_l2 = sqlx::query_as::<_, CategoryL2>(
            "SELECT c.id, c.name, c.description, c.parent_id, c.created_at
             FROM categories_l2 c
             INNER JOIN book_categories_l2 bc ON bc.category_id = c.id
             WHERE bc.book_id = $1
             ORDER BY c.name",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let themes = sqlx::query_as::<_, Theme>(
            "SELECT t.id, t.name, t.description, t.created_at
             FROM themes t
             INNER JOIN book_themes bt ON bt.theme_id = t.id
             WHERE bt.book_id = $1
             ORDER BY t.name",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let comments = sqlx::query_as::<_, CommentWithUser>(
            "SELECT c.id, c.book_id, c.user_id, c.content,
                    u.first_name AS user_first_name, u.last_name AS user_last_name,
                    c.created_at, c.updated_at
             FROM comments c
             INNER JOIN users u ON u.id = c.user_id
             WHERE c.book_id = $1
             ORDER BY c.created_at DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let ratings = sqlx::query_as::<_, RatingWithUser>(
            "SELECT r.id, r.book_id, r.user_id, r.score,
                    u.first_name AS user_first_name, u.last_name AS user_last_name,
                    r.created_at, r.updated_at
             FROM ratings r
             INNER JOIN users u ON u.id = r.user_id
             WHERE r.book_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(BookDetails {
            book,
            authors,
            publisher,
            language,
            book_type,
            categories_l1,
            categories_l2,
            themes,
            audience,
            reading_level,
            comments,
            ratings,
        }))
    }
}
