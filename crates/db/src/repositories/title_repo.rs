//! Repository for the `titles` and `genre_title` tables.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use yamdb_core::types::DbId;

use super::contains_pattern;
use crate::models::catalog::CatalogItem;
use crate::models::title::{NewTitle, TitleChanges, TitleDetail, TitleFilter, TitleGenreRow, TitleRow};

/// SELECT list producing a [`TitleRow`]; expects `titles t` and a
/// `LEFT JOIN categories c`.
const ROW_COLUMNS: &str = "\
    t.id, t.name, t.year, t.description, t.category_id, \
    c.name AS category_name, c.slug AS category_slug, \
    (SELECT AVG(r.score)::FLOAT8 FROM reviews r WHERE r.title_id = t.id) AS rating_avg";

const FROM_CLAUSE: &str = "FROM titles t LEFT JOIN categories c ON c.id = t.category_id";

/// Provides CRUD operations for titles, including their genre links and
/// derived rating.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction, returning the new id.
    pub async fn create(pool: &PgPool, input: &NewTitle) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_genres_inner(&mut tx, id, &input.genre_ids).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Find a title by id, with genres, category and rating.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        let query = format!("SELECT {ROW_COLUMNS} {FROM_CLAUSE} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let mut details = Self::attach_genres(pool, vec![row]).await?;
                Ok(details.pop())
            }
            None => Ok(None),
        }
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles matching `filter`, ordered by name.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_title_filter(filter);

        let query = format!(
            "SELECT {ROW_COLUMNS} {FROM_CLAUSE} {where_clause} \
             ORDER BY t.name, t.id \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, TitleRow>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Int(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
            };
        }
        let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;

        Self::attach_genres(pool, rows).await
    }

    /// Count titles matching `filter` (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_title_filter(filter);

        let query = format!("SELECT COUNT(*)::BIGINT {FROM_CLAUSE} {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Int(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
            };
        }
        q.fetch_one(pool).await
    }

    /// Apply a patch. Only non-`None` fields are written; `genre_ids`
    /// replaces the whole genre set. `description` and `category_id` are
    /// cleared by `Some(None)`.
    ///
    /// Returns `false` if no title with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TitleChanges,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE titles SET \
                name = COALESCE($2, name), \
                year = COALESCE($3, year), \
                description = CASE WHEN $4 THEN $5 ELSE description END, \
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(changes.year)
        .bind(changes.description.is_some())
        .bind(changes.description.as_ref().and_then(|d| d.as_deref()))
        .bind(changes.category_id.is_some())
        .bind(changes.category_id.flatten())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(genre_ids) = &changes.genre_ids {
            sqlx::query("DELETE FROM genre_title WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::set_genres_inner(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a title. Reviews, comments and genre links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Genres of the given titles, ordered by genre name.
    pub async fn genres_for_titles(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenreRow>, sqlx::Error> {
        if title_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, TitleGenreRow>(
            "SELECT gt.title_id, g.id, g.name, g.slug \
             FROM genre_title gt \
             JOIN genres g ON g.id = gt.genre_id \
             WHERE gt.title_id = ANY($1) \
             ORDER BY g.name, g.id",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }

    /// Combine title rows with their genres, preserving row order.
    async fn attach_genres(
        pool: &PgPool,
        rows: Vec<TitleRow>,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut by_title: HashMap<DbId, Vec<CatalogItem>> = HashMap::new();
        for g in Self::genres_for_titles(pool, &ids).await? {
            by_title.entry(g.title_id).or_default().push(CatalogItem {
                id: g.id,
                name: g.name,
                slug: g.slug,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genres = by_title.remove(&row.id).unwrap_or_default();
                TitleDetail::from_row(row, genres)
            })
            .collect())
    }

    async fn set_genres_inner(
        tx: &mut Transaction<'_, Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO genre_title (title_id, genre_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

/// Typed bind value for the dynamically-built title filter.
enum BindValue {
    Int(i32),
    Text(String),
}

/// Build a WHERE clause and bind values from [`TitleFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filter is active, otherwise it starts with `WHERE `.
fn build_title_filter(filter: &TitleFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref genre) = filter.genre {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM genre_title gt JOIN genres g ON g.id = gt.genre_id \
             WHERE gt.title_id = t.id AND g.slug = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(genre.clone()));
    }

    if let Some(ref category) = filter.category {
        conditions.push(format!("c.slug = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(category.clone()));
    }

    if let Some(year) = filter.year {
        conditions.push(format!("t.year = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(year));
    }

    if let Some(ref name) = filter.name {
        conditions.push(format!("t.name ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(contains_pattern(name)));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}
