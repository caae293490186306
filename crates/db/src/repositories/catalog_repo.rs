//! Repository for the `categories` and `genres` tables.

use sqlx::PgPool;

use super::contains_pattern;
use crate::models::catalog::{CatalogItem, CatalogKind, CreateCatalogItem};

/// Column list shared by both tables.
const COLUMNS: &str = "id, name, slug";

/// Provides CRUD operations for categories and genres.
///
/// Both tables have the same shape, so every method takes the
/// [`CatalogKind`] to operate on.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        kind: CatalogKind,
        input: &CreateCatalogItem,
    ) -> Result<CatalogItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        kind: CatalogKind,
        slug: &str,
    ) -> Result<Option<CatalogItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE slug = $1", kind.table());
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every entry whose slug is in `slugs`. Missing slugs are simply
    /// absent from the result.
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: CatalogKind,
        slugs: &[String],
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE slug = ANY($1) ORDER BY name, id",
            kind.table()
        );
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List entries ordered by name, optionally filtered by a name substring.
    pub async fn list(
        pool: &PgPool,
        kind: CatalogKind,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        match search {
            Some(term) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM {} WHERE name ILIKE $1 \
                     ORDER BY name, id LIMIT $2 OFFSET $3",
                    kind.table()
                );
                sqlx::query_as::<_, CatalogItem>(&query)
                    .bind(contains_pattern(term))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM {} ORDER BY name, id LIMIT $1 OFFSET $2",
                    kind.table()
                );
                sqlx::query_as::<_, CatalogItem>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Count entries matching the same filter as [`CatalogRepo::list`].
    pub async fn count(
        pool: &PgPool,
        kind: CatalogKind,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        match search {
            Some(term) => {
                let query = format!(
                    "SELECT COUNT(*)::BIGINT FROM {} WHERE name ILIKE $1",
                    kind.table()
                );
                sqlx::query_scalar::<_, i64>(&query)
                    .bind(contains_pattern(term))
                    .fetch_one(pool)
                    .await
            }
            None => {
                let query = format!("SELECT COUNT(*)::BIGINT FROM {}", kind.table());
                sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
            }
        }
    }

    /// Delete by slug. Returns `true` if a row was removed.
    ///
    /// Deleting a category nulls `titles.category_id`; deleting a genre
    /// drops its `genre_title` links.
    pub async fn delete_by_slug(
        pool: &PgPool,
        kind: CatalogKind,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE slug = $1", kind.table());
        let result = sqlx::query(&query).bind(slug).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
