//! Comments on reviews.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::types::{DbId, Timestamp};

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip)]
    pub review_id: DbId,
    #[serde(skip)]
    pub author_id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub pub_date: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub text: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}
