//! Permission predicates over (method, actor, object).
//!
//! These are pure functions; the API layer feeds them the request method,
//! the authenticated actor (if any) and, for object-level checks, the
//! object's author id.

use crate::roles::Role;
use crate::types::DbId;

/// HTTP methods that never modify state.
pub const SAFE_METHODS: &[&str] = &["GET", "HEAD", "OPTIONS"];

/// The authenticated caller, as far as permission decisions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
    pub is_superuser: bool,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role == Role::Admin
    }

    /// Admins and moderators may edit anybody's reviews and comments.
    pub fn is_staff(&self) -> bool {
        self.is_admin() || self.role == Role::Moderator
    }
}

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No credentials were supplied but the action needs them (401).
    Unauthenticated,
    /// Credentials were supplied but are insufficient (403).
    Denied,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

pub fn is_safe_method(method: &str) -> bool {
    SAFE_METHODS.contains(&method)
}

/// Catalog resources (categories, genres, titles): anyone reads, admins write.
pub fn catalog_access(method: &str, actor: Option<&Actor>) -> Decision {
    if is_safe_method(method) {
        return Decision::Allow;
    }
    admin_access(actor)
}

/// User administration: admins only, for every method.
pub fn admin_access(actor: Option<&Actor>) -> Decision {
    match actor {
        None => Decision::Unauthenticated,
        Some(a) if a.is_admin() => Decision::Allow,
        Some(_) => Decision::Denied,
    }
}

/// Collection-level check for reviews and comments: anyone reads, any
/// authenticated user creates.
pub fn authored_collection_access(method: &str, actor: Option<&Actor>) -> Decision {
    if is_safe_method(method) || actor.is_some() {
        Decision::Allow
    } else {
        Decision::Unauthenticated
    }
}

/// Object-level check for a review or comment written by `author_id`.
pub fn authored_object_access(method: &str, actor: Option<&Actor>, author_id: DbId) -> Decision {
    if is_safe_method(method) {
        return Decision::Allow;
    }
    match actor {
        None => Decision::Unauthenticated,
        Some(a) if a.user_id == author_id || a.is_staff() => Decision::Allow,
        Some(_) => Decision::Denied,
    }
}
