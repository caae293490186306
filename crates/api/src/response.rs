//! Paginated list envelope shared by every list endpoint.
//!
//! ```text
//! { "count": 42, "next": "/v1/titles?genre=drama&page=3",
//!   "previous": "/v1/titles?genre=drama", "results": [ ... ] }
//! ```

use axum::http::Uri;
use serde::Serialize;
use yamdb_core::error::CoreError;
use yamdb_core::pagination::PageWindow;

use crate::error::{AppError, AppResult};

/// Standard `{ count, next, previous, results }` page.
///
/// `next` and `previous` are the request path and query with the `page`
/// parameter replaced; the first page is linked without a `page` parameter.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    pub fn new(results: Vec<T>, count: i64, window: PageWindow, uri: &Uri) -> Self {
        let next = window
            .has_next(count)
            .then(|| page_link(uri, window.page + 1));
        let previous = window
            .has_previous()
            .then(|| page_link(uri, window.page - 1));
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Resolve `?page=` against the configured page size. Pages below 1 are 404.
pub fn page_window(page: Option<i64>, page_size: i64) -> AppResult<PageWindow> {
    PageWindow::new(page, page_size).ok_or_else(|| invalid_page(page.unwrap_or(1)))
}

/// Reject a window that lies past the last page of `count` items.
pub fn ensure_in_range(window: PageWindow, count: i64) -> AppResult<()> {
    if window.in_range(count) {
        Ok(())
    } else {
        Err(invalid_page(window.page))
    }
}

fn invalid_page(page: i64) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Page",
        field: "number",
        value: page.to_string(),
    })
}

/// Rebuild `uri` with its `page` parameter set to `page` (dropped for page 1).
fn page_link(uri: &Uri, page: i64) -> String {
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|p| !p.is_empty() && *p != "page" && !p.starts_with("page="))
        .map(str::to_string)
        .collect();
    if page > 1 {
        pairs.push(format!("page={page}"));
    }
    if pairs.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), pairs.join("&"))
    }
}
