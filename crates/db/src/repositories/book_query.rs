//! The book listing filter engine: translates the optional query keys into
//! one conjunctive WHERE clause plus a sort and pagination plan, then runs
//! a count query and a bounded fetch. Pure reads, no side effects.

use bouquin_core::catalog::{BookKind, SortSpec};
use bouquin_core::pagination::Paged;
use bouquin_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::book::{Book, BookQuery};
use crate::repositories::book_repo::BOOK_COLUMNS;

/// Typed bind value for dynamically-built book queries.
enum BindValue {
    BigInt(i64),
    Int(i32),
    Float(f64),
    Bool(bool),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from the supplied filter keys.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `. Absent keys
/// contribute no condition; the variant-conditional keys (`file_format`,
/// `max_duration`) only apply when the matching `kind` is also requested.
fn build_book_filter(params: &BookQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref title) = params.title {
        conditions.push(format!("title ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{title}%")));
    }

    if let Some(published) = params.is_published {
        conditions.push(format!("is_published = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(published));
    }

    if let Some(free) = params.is_free {
        conditions.push(format!("is_free = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(free));
    }

    if let Some(kind) = params.kind {
        conditions.push(format!("kind = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(kind.as_str().to_string()));
    }

    if let Some(min) = params.price_min {
        conditions.push(format!("price >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Float(min));
    }

    if let Some(max) = params.price_max {
        conditions.push(format!("price <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Float(max));
    }

    if let Some(from) = params.published_from {
        conditions.push(format!("date_published >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.published_to {
        conditions.push(format!("date_published <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    if let Some(language) = params.language {
        conditions.push(format!("language_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(language));
    }

    if let Some(book_type) = params.book_type {
        conditions.push(format!("book_type_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(book_type));
    }

    if let Some(audience) = params.audience {
        conditions.push(format!("audience_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(audience));
    }

    if let Some(level) = params.reading_level {
        conditions.push(format!("reading_level_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(level));
    }

    if let Some(publisher) = params.publisher {
        conditions.push(format!("publisher_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(publisher));
    }

    // Many-valued relationships filter through their junction tables.
    if let Some(category) = params.category_l1 {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM book_categories_l1 bc \
             WHERE bc.book_id = books.id AND bc.category_id = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category));
    }

    if let Some(category) = params.category_l2 {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM book_categories_l2 bc \
             WHERE bc.book_id = books.id AND bc.category_id = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category));
    }

    if let Some(theme) = params.theme {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM book_themes bt \
             WHERE bt.book_id = books.id AND bt.theme_id = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(theme));
    }

    if let Some(author) = params.author {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM book_authors ba \
             WHERE ba.book_id = books.id AND ba.author_id = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(author));
    }

    // Variant-conditional filters.
    if params.kind == Some(BookKind::Digital) {
        if let Some(ref format) = params.file_format {
            conditions.push(format!("file_format = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(format.clone()));
        }
    }

    if params.kind == Some(BookKind::Audio) {
        if let Some(max_duration) = params.max_duration {
            conditions.push(format!("duration_minutes <= ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Int(max_duration));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Executes filtered, sorted, paginated book listings.
pub struct BookQueryRepo;

impl BookQueryRepo {
    /// Run the listing: one count query plus one bounded, sorted, paged
    /// fetch. A page beyond the result range returns an empty item list
    /// with correct totals.
    pub async fn list(
        pool: &PgPool,
        params: &BookQuery,
        sort: SortSpec,
    ) -> Result<Paged<Book>, sqlx::Error> {
        let page = params.page_params();
        let (where_clause, binds, bind_idx) = build_book_filter(params);
        let direction = if sort.descending { "DESC" } else { "ASC" };

        tracing::debug!(
            filter = %where_clause,
            order = %sort.column,
            %direction,
            "Executing book listing"
        );

        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books {where_clause} \
             ORDER BY {} {direction} \
             LIMIT ${bind_idx} OFFSET ${}",
            sort.column,
            bind_idx + 1
        );
        let items = bind_values(sqlx::query_as::<_, Book>(&query), &binds)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM books {where_clause}");
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), &binds)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters_builds_empty_clause() {
        let (clause, binds, next_idx) = build_book_filter(&BookQuery::default());
        assert!(clause.is_empty());
        assert!(binds.is_empty());
        assert_eq!(next_idx, 1);
    }

    #[test]
    fn test_price_range_is_conjunctive() {
        let params = BookQuery {
            price_min: Some(5.0),
            price_max: Some(20.0),
            ..BookQuery::default()
        };
        let (clause, binds, next_idx) = build_book_filter(&params);
        assert_eq!(clause, "WHERE price >= $1 AND price <= $2");
        assert_eq!(binds.len(), 2);
        assert_eq!(next_idx, 3);
    }

    #[test]
    fn test_single_price_bound_stands_alone() {
        let params = BookQuery {
            price_min: Some(5.0),
            ..BookQuery::default()
        };
        let (clause, _, _) = build_book_filter(&params);
        assert_eq!(clause, "WHERE price >= $1");
    }

    #[test]
    fn test_title_match_is_partial_and_case_insensitive() {
        let params = BookQuery {
            title: Some("press".to_string()),
            ..BookQuery::default()
        };
        let (clause, binds, _) = build_book_filter(&params);
        assert_eq!(clause, "WHERE title ILIKE $1");
        assert!(matches!(&binds[0], BindValue::Text(t) if t == "%press%"));
    }

    #[test]
    fn test_file_format_requires_digital_kind() {
        // Without kind=digital, the file_format key imposes no constraint.
        let params = BookQuery {
            file_format: Some("EPUB".to_string()),
            ..BookQuery::default()
        };
        let (clause, _, _) = build_book_filter(&params);
        assert!(clause.is_empty());

        let params = BookQuery {
            kind: Some(BookKind::Digital),
            file_format: Some("EPUB".to_string()),
            ..BookQuery::default()
        };
        let (clause, _, _) = build_book_filter(&params);
        assert_eq!(clause, "WHERE kind = $1 AND file_format = $2");
    }

    #[test]
    fn test_max_duration_requires_audio_kind() {
        let params = BookQuery {
            max_duration: Some(120),
            ..BookQuery::default()
        };
        let (clause, _, _) = build_book_filter(&params);
        assert!(clause.is_empty());

        let params = BookQuery {
            kind: Some(BookKind::Audio),
            max_duration: Some(120),
            ..BookQuery::default()
        };
        let (clause, _, _) = build_book_filter(&params);
        assert_eq!(clause, "WHERE kind = $1 AND duration_minutes <= $2");
    }

    #[test]
    fn test_junction_filters_use_exists_subqueries() {
        let params = BookQuery {
            theme: Some(3),
            author: Some(9),
            ..BookQuery::default()
        };
        let (clause, binds, _) = build_book_filter(&params);
        assert!(clause.contains("EXISTS (SELECT 1 FROM book_themes"));
        assert!(clause.contains("EXISTS (SELECT 1 FROM book_authors"));
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn test_bind_indices_stay_sequential() {
        let params = BookQuery {
            title: Some("a".to_string()),
            is_published: Some(true),
            kind: Some(BookKind::Digital),
            price_min: Some(1.0),
            file_format: Some("PDF".to_string()),
            ..BookQuery::default()
        };
        let (clause, binds, next_idx) = build_book_filter(&params);
        for idx in 1..=binds.len() {
            assert!(clause.contains(&format!("${idx}")), "missing ${idx} in {clause}");
        }
        assert_eq!(next_idx as usize, binds.len() + 1);
    }
}
