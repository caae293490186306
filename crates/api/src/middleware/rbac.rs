//! Role-based access control (RBAC) extractors.
//!
//! Each extractor feeds the request method and the caller into a predicate
//! from [`yamdb_core::permissions`] and rejects with 401 (no credentials) or
//! 403 (insufficient role). Object-level checks on reviews and comments need
//! the loaded object, so handlers call [`enforce`] directly for those.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{
    admin_access, authored_collection_access, catalog_access, Decision,
};

use super::auth::{AuthUser, MaybeAuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Turn a permission [`Decision`] into a handler result.
pub fn enforce(decision: Decision) -> Result<(), AppError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Unauthenticated => Err(AppError::Core(CoreError::Unauthorized(
            "Authentication credentials were not provided".into(),
        ))),
        Decision::Denied => Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        ))),
    }
}

/// Requires an admin (role `admin` or superuser). Used for user administration.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(parts, state).await?;
        enforce(admin_access(user.as_ref().map(AuthUser::actor).as_ref()))?;
        user.map(RequireAdmin).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ))
        })
    }
}

/// Write access to categories, genres and titles.
///
/// Safe methods pass for anyone; everything else needs an admin.
pub struct CatalogWriter(pub Option<AuthUser>);

impl FromRequestParts<AppState> for CatalogWriter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(parts, state).await?;
        let actor = user.as_ref().map(AuthUser::actor);
        enforce(catalog_access(parts.method.as_str(), actor.as_ref()))?;
        Ok(CatalogWriter(user))
    }
}

/// Creating a review or comment: any authenticated user.
pub struct RequireAuthor(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuthor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(parts, state).await?;
        let actor = user.as_ref().map(AuthUser::actor);
        enforce(authored_collection_access(parts.method.as_str(), actor.as_ref()))?;
        user.map(RequireAuthor).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ))
        })
    }
}
