//! Page-based pagination parameters and the shared paged result envelope.
//!
//! All paginated listings (books, ratings, comments) speak `?page=&size=`
//! with a 1-based page number and return a [`Paged`] envelope carrying
//! `total_pages = ceil(total_count / size)`.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw `?page=&size=` query parameters. Values are normalized through
/// [`PageParams::page`] / [`PageParams::size`]; out-of-range input is
/// clamped rather than rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    /// 1-based page number, at least 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn size(&self) -> i64 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for a LIMIT/OFFSET query.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.size()
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

impl<T> Paged<T> {
    /// Assemble a page envelope from a fetched slice and the matching
    /// total row count.
    pub fn new(items: Vec<T>, params: PageParams, total_count: i64) -> Self {
        Paged {
            items,
            page: params.page(),
            total_pages: total_pages(total_count, params.size()),
            total_count,
        }
    }
}

/// `ceil(total_count / size)`; zero rows means zero pages.
pub fn total_pages(total_count: i64, size: i64) -> i64 {
    if total_count <= 0 {
        0
    } else {
        (total_count + size - 1) / size
    }
}
