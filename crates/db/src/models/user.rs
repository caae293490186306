//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::confirmation::CodeSubject;
use yamdb_core::permissions::Actor;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};
use yamdb_core::validation::{
    validate_username_not_reserved, MAX_EMAIL_LENGTH, MAX_PERSON_NAME_LENGTH,
    MAX_USERNAME_LENGTH, USERNAME_RE,
};

/// Full user row from the `users` table.
///
/// Carries internal fields (`id`, `is_superuser`, `last_login_at`); use
/// [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
    pub is_superuser: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed role. The `ck_users_role` constraint keeps the column valid.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role(),
            is_superuser: self.is_superuser,
        }
    }

    /// The state a confirmation code for this user is bound to.
    pub fn code_subject(&self) -> CodeSubject<'_> {
        CodeSubject {
            user_id: self.id,
            email: &self.email,
            last_login: self.last_login_at.map(|t| t.timestamp_micros()),
        }
    }
}

/// Public user representation.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            role: user.role(),
        }
    }
}

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(
            min = 1,
            max = MAX_USERNAME_LENGTH,
            message = "Username must be between 1 and 150 characters"
        ),
        regex(
            path = *USERNAME_RE,
            message = "Username may contain only letters, digits and @/./+/-/_"
        ),
        custom(function = "validate_username_not_reserved")
    )]
    pub username: String,
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 254 characters")
    )]
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Confirmation code is required"))]
    pub confirmation_code: String,
}

/// Request body for `POST /users` (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = 1,
            max = MAX_USERNAME_LENGTH,
            message = "Username must be between 1 and 150 characters"
        ),
        regex(
            path = *USERNAME_RE,
            message = "Username may contain only letters, digits and @/./+/-/_"
        ),
        custom(function = "validate_username_not_reserved")
    )]
    pub username: String,
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 254 characters")
    )]
    pub email: String,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH, message = "At most 150 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH, message = "At most 150 characters"))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `PATCH /users/{username}` and `PATCH /users/me`.
///
/// On `/users/me` the `role` field is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(
            min = 1,
            max = MAX_USERNAME_LENGTH,
            message = "Username must be between 1 and 150 characters"
        ),
        regex(
            path = *USERNAME_RE,
            message = "Username may contain only letters, digits and @/./+/-/_"
        ),
        custom(function = "validate_username_not_reserved")
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH, message = "At most 150 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH, message = "At most 150 characters"))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Insert input for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl NewUser {
    /// A plain `user`-role account with empty profile fields.
    pub fn signup(username: &str, email: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: Role::User,
            is_superuser: false,
        }
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            bio: req.bio.unwrap_or_default(),
            role: req.role.unwrap_or_default(),
            is_superuser: false,
        }
    }
}

/// Query parameters for `GET /users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    /// Case-insensitive substring match on `username`.
    pub search: Option<String>,
    pub page: Option<i64>,
}
