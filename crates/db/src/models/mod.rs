//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row (with `Serialize`
//!   when the row is also the public representation)
//! - `Deserialize` + `Validate` request DTOs for creates and patches
//! - Plain input structs handed to the repositories once references
//!   (slugs, usernames) have been resolved to ids

pub mod catalog;
pub mod comment;
pub mod review;
pub mod title;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a PATCH field that may be absent, `null` or a value.
///
/// Use with `#[serde(default, deserialize_with = "...")]`: absent stays
/// `None`, `null` becomes `Some(None)`.
pub(crate) fn nullable_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
