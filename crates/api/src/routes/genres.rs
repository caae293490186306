use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Genre routes mounted at `/genres`.
///
/// ```text
/// GET    /                  -> list_genres
/// POST   /                  -> create_genre (admin)
/// DELETE /{slug}            -> delete_genre (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_genres).post(catalog::create_genre))
        .route("/{slug}", delete(catalog::delete_genre))
}
