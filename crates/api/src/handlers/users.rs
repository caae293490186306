//! Handlers for user administration (`/users`) and the caller's own
//! profile (`/users/me`).

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_db::models::user::{
    CreateUserRequest, NewUser, UpdateUserRequest, UserListParams, UserResponse,
};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ensure_in_range, page_window, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /v1/users
///
/// `?search=` matches a username substring.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<UserListParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let window = page_window(params.page, state.config.page_size)?;
    let search = params.search.as_deref().filter(|s| !s.is_empty());

    let count = UserRepo::count(&state.pool, search).await?;
    ensure_in_range(window, count)?;

    let users = UserRepo::list(&state.pool, search, window.limit(), window.offset()).await?;
    let results = users.iter().map(UserResponse::from).collect();

    Ok(Json(Page::new(results, count, window, &uri)))
}

/// POST /v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = UserRepo::create(&state.pool, &NewUser::from(input)).await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        admin_id = admin.user_id(),
        "User created",
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /v1/users/{username}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| user_not_found(&username))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /v1/users/{username}
///
/// Admins may change any field, including `role`.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| user_not_found(&username))?;

    let updated = UserRepo::update(&state.pool, user.id, &input)
        .await?
        .ok_or_else(|| user_not_found(&username))?;

    tracing::info!(user_id = updated.id, admin_id = admin.user_id(), "User updated");

    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /v1/users/{username}
///
/// The user's reviews and comments are deleted with the account.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    if !UserRepo::delete_by_username(&state.pool, &username).await? {
        return Err(user_not_found(&username));
    }

    tracing::info!(username = %username, admin_id = admin.user_id(), "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /v1/users/me
pub async fn get_me(auth: AuthUser) -> AppResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(&auth.user)))
}

/// PATCH /v1/users/me
///
/// `role` is read-only here, for admins too; it is silently ignored.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(mut input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    input.role = None;

    let updated = UserRepo::update(&state.pool, auth.user_id(), &input)
        .await?
        .ok_or_else(|| user_not_found(&auth.user.username))?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(UserResponse::from(&updated)))
}

fn user_not_found(username: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "User",
        field: "username",
        value: username.to_string(),
    })
}
