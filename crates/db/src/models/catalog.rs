//! Categories and genres: both are a `name` plus a unique `slug`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::DbId;
use yamdb_core::validation::{MAX_NAME_LENGTH, MAX_SLUG_LENGTH, SLUG_RE};

/// Which of the two slug-keyed lookup tables an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    Genre,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Category => "categories",
            CatalogKind::Genre => "genres",
        }
    }

    /// Entity name used in error messages and logs.
    pub fn entity(self) -> &'static str {
        match self {
            CatalogKind::Category => "Category",
            CatalogKind::Genre => "Genre",
        }
    }
}

/// A row from `categories` or `genres`. Serializes as `{name, slug}`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CatalogItem {
    #[serde(skip)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Request body for `POST /categories` and `POST /genres`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCatalogItem {
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Name must be between 1 and 256 characters"
    ))]
    pub name: String,
    #[validate(
        length(
            min = 1,
            max = MAX_SLUG_LENGTH,
            message = "Slug must be between 1 and 50 characters"
        ),
        regex(
            path = *SLUG_RE,
            message = "Slug may contain only Latin letters, digits, '-' and '_'"
        )
    )]
    pub slug: String,
}

/// Query parameters for catalog list endpoints (`?search=&page=`).
#[derive(Debug, Default, Deserialize)]
pub struct CatalogListParams {
    /// Case-insensitive substring match on `name`.
    pub search: Option<String>,
    pub page: Option<i64>,
}
