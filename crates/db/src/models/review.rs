//! Reviews of titles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::{DbId, Timestamp};

/// A review joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip)]
    pub title_id: DbId,
    #[serde(skip)]
    pub author_id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub score: i32,
    pub pub_date: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Review text must not be empty"))]
    pub text: String,
    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, message = "Review text must not be empty"))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i32,
}
