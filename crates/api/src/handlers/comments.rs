//! Handlers for comments, nested under
//! `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::{OriginalUri, Path, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::authored_object_access;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::{
    Comment, CreateCommentRequest, NewComment, UpdateCommentRequest,
};
use yamdb_db::repositories::CommentRepo;

use super::reviews::load_review;
use crate::error::{AppError, AppResult};
use crate::extract::{typed_body, ApiJson, ApiQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{enforce, RequireAuthor};
use crate::query::PageParams;
use crate::response::{ensure_in_range, page_window, Page};
use crate::state::AppState;

/// GET /v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Page<Comment>>> {
    let review = load_review(&state, title_id, review_id).await?;
    let window = page_window(params.page, state.config.page_size)?;

    let count = CommentRepo::count_for_review(&state.pool, review.id).await?;
    ensure_in_range(window, count)?;

    let comments =
        CommentRepo::list_for_review(&state.pool, review.id, window.limit(), window.offset())
            .await?;

    Ok(Json(Page::new(comments, count, window, &uri)))
}

/// POST /v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    RequireAuthor(auth): RequireAuthor,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let review = load_review(&state, title_id, review_id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &NewComment {
            review_id: review.id,
            author_id: auth.user_id(),
            text: input.text,
        },
    )
    .await?;

    tracing::info!(
        comment_id = comment.id,
        review_id,
        user_id = auth.user_id(),
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(
        load_comment(&state, title_id, review_id, comment_id).await?,
    ))
}

/// PATCH /v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///
/// Author, moderator or admin only. The body is typed and validated after
/// the permission check.
pub async fn update_comment(
    auth: AuthUser,
    method: Method,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> AppResult<Json<Comment>> {
    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    enforce(authored_object_access(
        method.as_str(),
        Some(&auth.actor()),
        comment.author_id,
    ))?;
    let input: UpdateCommentRequest = typed_body(body)?;

    let updated = CommentRepo::update(&state.pool, comment.id, input.text.as_deref())
        .await?
        .ok_or_else(|| comment_not_found(comment_id))?;

    tracing::info!(comment_id, review_id, user_id = auth.user_id(), "Comment updated");

    Ok(Json(updated))
}

/// DELETE /v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///
/// Author, moderator or admin only.
pub async fn delete_comment(
    auth: AuthUser,
    method: Method,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    enforce(authored_object_access(
        method.as_str(),
        Some(&auth.actor()),
        comment.author_id,
    ))?;

    if !CommentRepo::delete(&state.pool, comment.id).await? {
        return Err(comment_not_found(comment_id));
    }

    tracing::info!(comment_id, review_id, user_id = auth.user_id(), "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn load_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    let review = load_review(state, title_id, review_id).await?;
    CommentRepo::find_in_review(&state.pool, review.id, comment_id)
        .await?
        .ok_or_else(|| comment_not_found(comment_id))
}

fn comment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Comment",
        id,
    })
}
