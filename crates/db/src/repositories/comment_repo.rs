//! Repository for the `comments` table.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::comment::{Comment, NewComment};

/// SELECT list producing a [`Comment`]; expects `cm` (comments) joined to `u` (users).
const COLUMNS: &str = "cm.id, cm.review_id, cm.author_id, cm.text, u.username AS author, cm.pub_date";

/// Provides CRUD operations for comments, always scoped to a review.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &NewComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH cm AS ( \
                INSERT INTO comments (review_id, author_id, text) \
                VALUES ($1, $2, $3) \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM cm JOIN users u ON u.id = cm.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.review_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by id within the given review.
    pub async fn find_in_review(
        pool: &PgPool,
        review_id: DbId,
        comment_id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments cm JOIN users u ON u.id = cm.author_id \
             WHERE cm.id = $1 AND cm.review_id = $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    /// List a review's comments, oldest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments cm JOIN users u ON u.id = cm.author_id \
             WHERE cm.review_id = $1 \
             ORDER BY cm.pub_date, cm.id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_review(pool: &PgPool, review_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(pool)
            .await
    }

    /// Replace the comment text. Returns `None` if the comment does not exist.
    pub async fn update(
        pool: &PgPool,
        comment_id: DbId,
        text: Option<&str>,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "WITH cm AS ( \
                UPDATE comments SET text = COALESCE($2, text) \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM cm JOIN users u ON u.id = cm.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(comment_id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, comment_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
