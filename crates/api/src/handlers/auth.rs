//! Handlers for the signup / confirmation-code / token flow.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_db::models::user::{NewUser, SignupRequest, TokenRequest, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::MaybeAuthUser;
use crate::state::AppState;

/// Response body for a successful signup.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Response body for a successful token exchange.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /v1/auth/signup
///
/// Register (or re-register) a username/email pair and send a confirmation
/// code to the email. Sending an existing pair again issues a fresh code.
/// Codes are not mailed when an admin performs the signup.
pub async fn signup(
    State(state): State<AppState>,
    requester: MaybeAuthUser,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let user = find_or_create_signup(&state, &input).await?;

    let code = state
        .config
        .confirmation
        .signer()
        .make_code(&user.code_subject(), chrono::Utc::now().timestamp());

    let by_admin = requester.actor().is_some_and(|a| a.is_admin());
    if by_admin {
        tracing::info!(user_id = user.id, "Signup by admin, confirmation code not sent");
    } else if let Err(e) = state.mailer.send_code(&user.email, &code).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to deliver confirmation code");
    }

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// Reuse the user with exactly this username and email, or create one.
///
/// A username or email already held by a different account is a 400.
async fn find_or_create_signup(state: &AppState, input: &SignupRequest) -> AppResult<User> {
    let by_username = UserRepo::find_by_username(&state.pool, &input.username).await?;
    if let Some(user) = by_username.as_ref().filter(|u| u.email == input.email) {
        return Ok(user.clone());
    }

    let mut errors = FieldErrors::new();
    if by_username.is_some() {
        errors.insert(
            "username".into(),
            vec!["A user with that username already exists".into()],
        );
    }
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        errors.insert(
            "email".into(),
            vec!["A user with that email already exists".into()],
        );
    }
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::FieldErrors(errors)));
    }

    let user = UserRepo::create(&state.pool, &NewUser::signup(&input.username, &input.email))
        .await?;
    tracing::info!(user_id = user.id, username = %user.username, "User signed up");
    Ok(user)
}

/// POST /v1/auth/token
///
/// Exchange a username and confirmation code for a JWT access token. A
/// successful exchange records the login, which invalidates every code
/// issued before it.
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "User",
                field: "username",
                value: input.username.clone(),
            })
        })?;

    let valid = state.config.confirmation.signer().check_code(
        &user.code_subject(),
        &input.confirmation_code,
        chrono::Utc::now().timestamp(),
    );
    if !valid {
        tracing::info!(user_id = user.id, "Rejected confirmation code");
        return Err(invalid_code());
    }

    if !UserRepo::record_login(&state.pool, user.id, user.last_login_at).await? {
        tracing::info!(user_id = user.id, "Confirmation code already redeemed");
        return Err(invalid_code());
    }

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}

fn invalid_code() -> AppError {
    AppError::Core(CoreError::field(
        "confirmation_code",
        "Invalid or expired confirmation code",
    ))
}
