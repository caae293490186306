//! Titles and their genre links.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::rating::round_rating;
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_genre_list, validate_year_not_future, MAX_NAME_LENGTH};

use super::catalog::CatalogItem;
use super::nullable_field;

/// A title joined with its category and the raw review score average.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// `AVG(reviews.score)`; `NULL` when the title has no reviews.
    pub rating_avg: Option<f64>,
}

/// A genre attached to a title, as returned by the batch genre lookup.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenreRow {
    pub title_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Public title representation.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<CatalogItem>,
    pub category: Option<CatalogItem>,
}

impl TitleDetail {
    pub fn from_row(row: TitleRow, genre: Vec<CatalogItem>) -> Self {
        let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CatalogItem { id, name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: round_rating(row.rating_avg),
            description: row.description,
            genre,
            category,
        }
    }
}

/// Request body for `POST /titles`. Genres and category are given by slug.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Name must be between 1 and 256 characters"
    ))]
    pub name: String,
    #[validate(custom(function = "validate_year_not_future"))]
    pub year: i32,
    pub description: Option<String>,
    #[validate(custom(function = "validate_genre_list"))]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// Request body for `PATCH /titles/{id}`. Absent fields are left unchanged;
/// `description` and `category` can be cleared with an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Name must be between 1 and 256 characters"
    ))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_year_not_future"))]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub description: Option<Option<String>>,
    #[validate(custom(function = "validate_genre_list"))]
    pub genre: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub category: Option<Option<String>>,
}

/// Insert input with references already resolved to ids.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// Patch input with references already resolved to ids.
///
/// `genre_ids: Some(..)` replaces the full genre set. For `description` and
/// `category_id`, `Some(None)` clears the column.
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<DbId>>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /titles`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleFilter {
    /// Genre slug.
    pub genre: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub year: Option<i32>,
    /// Case-insensitive substring match on the title name.
    pub name: Option<String>,
    pub page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn create_rejects_future_year_and_empty_genres() {
        let next_year = chrono::Utc::now().year() + 1;
        let req: CreateTitleRequest = serde_json::from_value(serde_json::json!({
            "name": "Tomorrow",
            "year": next_year,
            "genre": [],
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("genre"));
    }

    #[test]
    fn update_checks_year_only_when_present() {
        let next_year = chrono::Utc::now().year() + 1;
        let absent: UpdateTitleRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.validate().is_ok());

        let future: UpdateTitleRequest =
            serde_json::from_value(serde_json::json!({ "year": next_year })).unwrap();
        assert!(future.validate().unwrap_err().field_errors().contains_key("year"));
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let absent: UpdateTitleRequest = serde_json::from_str(r#"{"name": "Heat"}"#).unwrap();
        assert_eq!(absent.category, None);
        assert_eq!(absent.description, None);

        let cleared: UpdateTitleRequest =
            serde_json::from_str(r#"{"category": null, "description": null}"#).unwrap();
        assert_eq!(cleared.category, Some(None));
        assert_eq!(cleared.description, Some(None));

        let set: UpdateTitleRequest = serde_json::from_str(r#"{"category": "film"}"#).unwrap();
        assert_eq!(set.category, Some(Some("film".to_string())));
    }
}
