//! Page-number pagination arithmetic.

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on a configured page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a configured page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(size: i64) -> i64 {
    size.clamp(1, MAX_PAGE_SIZE)
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub size: i64,
}

impl PageWindow {
    /// Resolve the requested page number (1-based, defaults to 1).
    ///
    /// Returns `None` for pages below 1.
    pub fn new(page: Option<i64>, size: i64) -> Option<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return None;
        }
        Some(Self {
            page,
            size: clamp_page_size(size),
        })
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.size
    }

    /// Number of pages needed for `count` items; an empty set still has page 1.
    pub fn last_page(&self, count: i64) -> i64 {
        if count <= 0 {
            1
        } else {
            (count + self.size - 1) / self.size
        }
    }

    /// Whether this page exists for a result set of `count` items.
    pub fn in_range(&self, count: i64) -> bool {
        self.page <= self.last_page(count)
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.page < self.last_page(count)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
