//! Field limits and custom validators shared by request DTOs.
//!
//! The `validate_*` functions have the signature expected by
//! `#[validate(custom(function = ...))]`.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of a category, genre or title name.
pub const MAX_NAME_LENGTH: u64 = 256;

/// Maximum length of a category or genre slug.
pub const MAX_SLUG_LENGTH: u64 = 50;

pub const MAX_USERNAME_LENGTH: u64 = 150;
pub const MAX_EMAIL_LENGTH: u64 = 254;
pub const MAX_PERSON_NAME_LENGTH: u64 = 150;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// Usernames that would collide with fixed routes.
pub const RESERVED_USERNAMES: &[&str] = &["me"];

/// Letters, digits and `.@+-_` (Unicode word characters allowed).
pub static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("static regex"));

pub static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("static regex"));

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Reject usernames reserved for routing (`me`).
pub fn validate_username_not_reserved(username: &str) -> Result<(), ValidationError> {
    if RESERVED_USERNAMES.contains(&username) {
        return Err(error(
            "reserved",
            format!("Username '{username}' is not available"),
        ));
    }
    Ok(())
}

/// Reject release years in the future.
pub fn validate_year_not_future(year: i32) -> Result<(), ValidationError> {
    let current = chrono::Utc::now().year();
    if year > current {
        return Err(error(
            "future_year",
            format!("Year {year} is later than the current year {current}"),
        ));
    }
    Ok(())
}

/// Reject an empty genre slug list.
pub fn validate_genre_list(genres: &[String]) -> Result<(), ValidationError> {
    if genres.is_empty() {
        return Err(error(
            "empty",
            "At least one genre is required".to_string(),
        ));
    }
    Ok(())
}
