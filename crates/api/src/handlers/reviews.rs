//! Handlers for reviews, nested under `/titles/{title_id}/reviews`.

use axum::extract::{OriginalUri, Path, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::authored_object_access;
use yamdb_core::types::DbId;
use yamdb_db::models::review::{CreateReviewRequest, NewReview, Review, UpdateReviewRequest};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{typed_body, ApiJson, ApiQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{enforce, RequireAuthor};
use crate::query::PageParams;
use crate::response::{ensure_in_range, page_window, Page};
use crate::state::AppState;

/// GET /v1/titles/{title_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(title_id): Path<DbId>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title(&state, title_id).await?;
    let window = page_window(params.page, state.config.page_size)?;

    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;
    ensure_in_range(window, count)?;

    let reviews =
        ReviewRepo::list_for_title(&state.pool, title_id, window.limit(), window.offset())
            .await?;

    Ok(Json(Page::new(reviews, count, window, &uri)))
}

/// POST /v1/titles/{title_id}/reviews
///
/// One review per user per title; a second attempt is a 400.
pub async fn create_review(
    RequireAuthor(auth): RequireAuthor,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_title(&state, title_id).await?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, auth.user_id()).await? {
        return Err(AppError::Core(CoreError::field(
            "non_field_errors",
            "You have already reviewed this title",
        )));
    }

    let review = ReviewRepo::create(
        &state.pool,
        &NewReview {
            title_id,
            author_id: auth.user_id(),
            text: input.text,
            score: input.score,
        },
    )
    .await?;

    tracing::info!(
        review_id = review.id,
        title_id,
        user_id = auth.user_id(),
        score = review.score,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(load_review(&state, title_id, review_id).await?))
}

/// PATCH /v1/titles/{title_id}/reviews/{review_id}
///
/// Author, moderator or admin only. The body is typed and validated after
/// the permission check.
pub async fn update_review(
    auth: AuthUser,
    method: Method,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> AppResult<Json<Review>> {
    let review = load_review(&state, title_id, review_id).await?;
    enforce(authored_object_access(
        method.as_str(),
        Some(&auth.actor()),
        review.author_id,
    ))?;
    let input: UpdateReviewRequest = typed_body(body)?;

    let updated = ReviewRepo::update(&state.pool, review.id, input.text.as_deref(), input.score)
        .await?
        .ok_or_else(|| review_not_found(review_id))?;

    tracing::info!(review_id, title_id, user_id = auth.user_id(), "Review updated");

    Ok(Json(updated))
}

/// DELETE /v1/titles/{title_id}/reviews/{review_id}
///
/// Author, moderator or admin only. Comments are deleted with the review.
pub async fn delete_review(
    auth: AuthUser,
    method: Method,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = load_review(&state, title_id, review_id).await?;
    enforce(authored_object_access(
        method.as_str(),
        Some(&auth.actor()),
        review.author_id,
    ))?;

    if !ReviewRepo::delete(&state.pool, review.id).await? {
        return Err(review_not_found(review_id));
    }

    tracing::info!(review_id, title_id, user_id = auth.user_id(), "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_title(state: &AppState, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(&state.pool, title_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        }))
    }
}

/// Load a review that belongs to `title_id`.
pub(crate) async fn load_review(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ensure_title(state, title_id).await?;
    ReviewRepo::find_in_title(&state.pool, title_id, review_id)
        .await?
        .ok_or_else(|| review_not_found(review_id))
}

fn review_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Review",
        id,
    })
}
