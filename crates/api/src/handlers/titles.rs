//! Handlers for titles.
//!
//! Genres and category are written by slug and resolved to ids here, so an
//! unknown slug is reported as a field error rather than a constraint failure.

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_db::models::catalog::CatalogKind;
use yamdb_db::models::title::{
    CreateTitleRequest, NewTitle, TitleChanges, TitleDetail, TitleFilter, UpdateTitleRequest,
};
use yamdb_db::repositories::{CatalogRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidatedJson};
use crate::middleware::rbac::CatalogWriter;
use crate::response::{ensure_in_range, page_window, Page};
use crate::state::AppState;

/// GET /v1/titles
///
/// Filters: `genre` and `category` (slugs), `year`, `name` (substring).
pub async fn list_titles(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(filter): ApiQuery<TitleFilter>,
) -> AppResult<Json<Page<TitleDetail>>> {
    let window = page_window(filter.page, state.config.page_size)?;

    let count = TitleRepo::count(&state.pool, &filter).await?;
    ensure_in_range(window, count)?;

    let titles = TitleRepo::list(&state.pool, &filter, window.limit(), window.offset()).await?;

    Ok(Json(Page::new(titles, count, window, &uri)))
}

/// POST /v1/titles
pub async fn create_title(
    CatalogWriter(writer): CatalogWriter,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleDetail>)> {
    let genre_ids = resolve_genres(&state, &input.genre).await?;
    let category_id = match input.category.as_deref() {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };

    let new_title = NewTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    let id = TitleRepo::create(&state.pool, &new_title).await?;
    let title = load_title(&state, id).await?;

    tracing::info!(
        title_id = id,
        user_id = writer.as_ref().map(|w| w.user_id()),
        "Title created",
    );

    Ok((StatusCode::CREATED, Json(title)))
}

/// GET /v1/titles/{id}
pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<Json<TitleDetail>> {
    Ok(Json(load_title(&state, title_id).await?))
}

/// PATCH /v1/titles/{id}
///
/// Absent fields are left unchanged; `genre` replaces the whole genre set.
/// `"category": null` and `"description": null` clear those fields.
pub async fn update_title(
    CatalogWriter(writer): CatalogWriter,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTitleRequest>,
) -> AppResult<Json<TitleDetail>> {
    let genre_ids = match input.genre.as_deref() {
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };
    let category_id = match input.category {
        Some(Some(slug)) => Some(Some(resolve_category(&state, &slug).await?)),
        Some(None) => Some(None),
        None => None,
    };

    let changes = TitleChanges {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    if !TitleRepo::update(&state.pool, title_id, &changes).await? {
        return Err(title_not_found(title_id));
    }
    let title = load_title(&state, title_id).await?;

    tracing::info!(
        title_id,
        user_id = writer.as_ref().map(|w| w.user_id()),
        "Title updated",
    );

    Ok(Json(title))
}

/// DELETE /v1/titles/{id}
///
/// Reviews and their comments are deleted with the title.
pub async fn delete_title(
    CatalogWriter(writer): CatalogWriter,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TitleRepo::delete(&state.pool, title_id).await? {
        return Err(title_not_found(title_id));
    }

    tracing::info!(
        title_id,
        user_id = writer.as_ref().map(|w| w.user_id()),
        "Title deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn load_title(state: &AppState, title_id: DbId) -> AppResult<TitleDetail> {
    TitleRepo::find_by_id(&state.pool, title_id)
        .await?
        .ok_or_else(|| title_not_found(title_id))
}

fn title_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Title",
        id,
    })
}

/// Map genre slugs to ids, preserving request order. Any unknown slug is a 400.
async fn resolve_genres(state: &AppState, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let found = CatalogRepo::find_by_slugs(&state.pool, CatalogKind::Genre, slugs).await?;

    let mut ids = Vec::with_capacity(slugs.len());
    let mut missing = Vec::new();
    for slug in slugs {
        match found.iter().find(|g| &g.slug == slug) {
            Some(genre) => ids.push(genre.id),
            None => missing.push(format!("Genre '{slug}' does not exist")),
        }
    }

    if !missing.is_empty() {
        let mut errors = yamdb_core::error::FieldErrors::new();
        errors.insert("genre".into(), missing);
        return Err(AppError::Core(CoreError::FieldErrors(errors)));
    }
    Ok(ids)
}

async fn resolve_category(state: &AppState, slug: &str) -> AppResult<DbId> {
    CatalogRepo::find_by_slug(&state.pool, CatalogKind::Category, slug)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| {
            AppError::Core(CoreError::field(
                "category",
                format!("Category '{slug}' does not exist"),
            ))
        })
}
