pub mod auth;
pub mod categories;
pub mod genres;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                      register, send code (public)
/// /auth/token                                       exchange code for JWT (public)
///
/// /categories                                       list, create (write: admin)
/// /categories/{slug}                                delete (admin)
///
/// /genres                                           list, create (write: admin)
/// /genres/{slug}                                    delete (admin)
///
/// /titles                                           list, create (write: admin)
/// /titles/{id}                                      get, update, delete (write: admin)
/// /titles/{id}/reviews                              list, create (create: authenticated)
/// /titles/{id}/reviews/{id}                         get, update, delete (author/staff)
/// /titles/{id}/reviews/{id}/comments                list, create (create: authenticated)
/// /titles/{id}/reviews/{id}/comments/{id}           get, update, delete (author/staff)
///
/// /users                                            list, create (admin)
/// /users/me                                         get, update own profile
/// /users/{username}                                 get, update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        .nest("/titles", titles::router())
        .nest("/users", users::router())
}
