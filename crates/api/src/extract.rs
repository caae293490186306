//! Request body and query extractors that reject with [`AppError`].
//!
//! Axum's stock `Json` and `Query` reject with plain-text bodies; these
//! wrappers keep every 400 in the JSON error envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body deserialized into `T`. Malformed or mistyped JSON is a 400.
///
/// When typing and validation have to wait until after a permission check,
/// extract `ApiJson<serde_json::Value>` and finish with [`typed_body`].
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(e.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// JSON body deserialized into `T` and checked with [`Validate`].
///
/// Validation failures become a 400 with per-field messages.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Deserialize and validate a body extracted as `serde_json::Value`.
///
/// Mistyped fields and validation failures are both a 400.
pub fn typed_body<T>(value: serde_json::Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let typed: T = serde_json::from_value(value).map_err(|e| {
        AppError::BadRequest(format!(
            "Failed to deserialize the JSON body into the target type: {e}"
        ))
    })?;
    typed.validate()?;
    Ok(typed)
}

/// Query string deserialized into `T`. Unparseable values are a 400.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::BadRequest(e.body_text()))?;
        Ok(ApiQuery(value))
    }
}
