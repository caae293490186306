//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination parameter (`?page=`), for list endpoints that
/// have no other filters.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}
