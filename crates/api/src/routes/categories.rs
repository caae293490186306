use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET    /                  -> list_categories
/// POST   /                  -> create_category (admin)
/// DELETE /{slug}            -> delete_category (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/{slug}", delete(catalog::delete_category))
}
