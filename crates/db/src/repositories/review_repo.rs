//! Repository for the `reviews` table.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::review::{NewReview, Review};

/// SELECT list producing a [`Review`]; expects `r` (reviews) joined to `u` (users).
const COLUMNS: &str = "r.id, r.title_id, r.author_id, r.text, u.username AS author, r.score, r.pub_date";

/// Provides CRUD operations for reviews, always scoped to a title.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. Fails with a `uq_reviews_author_title` violation if
    /// the author already reviewed the title.
    pub async fn create(pool: &PgPool, input: &NewReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "WITH r AS ( \
                INSERT INTO reviews (title_id, author_id, text, score) \
                VALUES ($1, $2, $3, $4) \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.title_id)
            .bind(input.author_id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_one(pool)
            .await
    }

    /// Find a review by id within the given title.
    pub async fn find_in_title(
        pool: &PgPool,
        title_id: DbId,
        review_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id \
             WHERE r.id = $1 AND r.title_id = $2"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `author_id` has already reviewed `title_id`.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// List a title's reviews, oldest first.
    pub async fn list_for_title(
        pool: &PgPool,
        title_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id \
             WHERE r.title_id = $1 \
             ORDER BY r.pub_date, r.id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_title(pool: &PgPool, title_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(pool)
            .await
    }

    /// Update text and/or score. Returns `None` if the review does not exist.
    pub async fn update(
        pool: &PgPool,
        review_id: DbId,
        text: Option<&str>,
        score: Option<i32>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "WITH r AS ( \
                UPDATE reviews SET \
                    text = COALESCE($2, text), \
                    score = COALESCE($3, score) \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(review_id)
            .bind(text)
            .bind(score)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review and, by cascade, its comments.
    pub async fn delete(pool: &PgPool, review_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
