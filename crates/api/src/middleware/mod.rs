//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Loads the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but anonymous requests are allowed.
//! - [`rbac::RequireAdmin`] -- Requires an admin or superuser.
//! - [`rbac::CatalogWriter`] -- Catalog access: anyone reads, admins write.
//! - [`rbac::RequireAuthor`] -- Any authenticated user may create reviews and comments.

pub mod auth;
pub mod rbac;
