//! Handlers for categories and genres.
//!
//! Both resources share one table shape, so each endpoint is a thin wrapper
//! passing its [`CatalogKind`] to a shared implementation.

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_db::models::catalog::{CatalogItem, CatalogKind, CatalogListParams, CreateCatalogItem};
use yamdb_db::repositories::CatalogRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidatedJson};
use crate::middleware::rbac::CatalogWriter;
use crate::response::{ensure_in_range, page_window, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<CatalogListParams>,
) -> AppResult<Json<Page<CatalogItem>>> {
    list_items(&state, CatalogKind::Category, &params, &uri).await
}

/// POST /v1/categories
pub async fn create_category(
    writer: CatalogWriter,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCatalogItem>,
) -> AppResult<(StatusCode, Json<CatalogItem>)> {
    create_item(&state, CatalogKind::Category, writer, &input).await
}

/// DELETE /v1/categories/{slug}
///
/// Titles in the category are kept with no category.
pub async fn delete_category(
    writer: CatalogWriter,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    delete_item(&state, CatalogKind::Category, writer, &slug).await
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<CatalogListParams>,
) -> AppResult<Json<Page<CatalogItem>>> {
    list_items(&state, CatalogKind::Genre, &params, &uri).await
}

/// POST /v1/genres
pub async fn create_genre(
    writer: CatalogWriter,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCatalogItem>,
) -> AppResult<(StatusCode, Json<CatalogItem>)> {
    create_item(&state, CatalogKind::Genre, writer, &input).await
}

/// DELETE /v1/genres/{slug}
pub async fn delete_genre(
    writer: CatalogWriter,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    delete_item(&state, CatalogKind::Genre, writer, &slug).await
}

// ---------------------------------------------------------------------------
// Shared implementation
// ---------------------------------------------------------------------------

async fn list_items(
    state: &AppState,
    kind: CatalogKind,
    params: &CatalogListParams,
    uri: &axum::http::Uri,
) -> AppResult<Json<Page<CatalogItem>>> {
    let window = page_window(params.page, state.config.page_size)?;
    let search = params.search.as_deref().filter(|s| !s.is_empty());

    let count = CatalogRepo::count(&state.pool, kind, search).await?;
    ensure_in_range(window, count)?;

    let items =
        CatalogRepo::list(&state.pool, kind, search, window.limit(), window.offset()).await?;

    Ok(Json(Page::new(items, count, window, uri)))
}

async fn create_item(
    state: &AppState,
    kind: CatalogKind,
    CatalogWriter(writer): CatalogWriter,
    input: &CreateCatalogItem,
) -> AppResult<(StatusCode, Json<CatalogItem>)> {
    let item = CatalogRepo::create(&state.pool, kind, input).await?;

    tracing::info!(
        entity = kind.entity(),
        slug = %item.slug,
        user_id = writer.as_ref().map(|w| w.user_id()),
        "Catalog entry created",
    );

    Ok((StatusCode::CREATED, Json(item)))
}

async fn delete_item(
    state: &AppState,
    kind: CatalogKind,
    CatalogWriter(writer): CatalogWriter,
    slug: &str,
) -> AppResult<StatusCode> {
    let deleted = CatalogRepo::delete_by_slug(&state.pool, kind, slug).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: kind.entity(),
            field: "slug",
            value: slug.to_string(),
        }));
    }

    tracing::info!(
        entity = kind.entity(),
        slug,
        user_id = writer.as_ref().map(|w| w.user_id()),
        "Catalog entry deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
