//! Request extractors.
//!
//! ## Actor Headers
//! Authentication happens upstream. The gateway forwards the resolved caller
//! as headers:
//!
//! ```text
//! x-actor-id: 17            user id (audit log, sale employee)
//! x-actor-role: BRANCH_MANAGER
//! x-client-id: 42           set when the caller is a storefront customer
//! x-branch-id: 5            set when the caller works at a branch
//! ```
//! Every header is optional here; handlers decide what they require.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use sportline_core::validation::validate_id;
use sportline_core::{Role, ValidationError};

use crate::error::{ApiError, ApiResult};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const BRANCH_ID_HEADER: &str = "x-branch-id";

/// The caller, as resolved by the auth gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub id: Option<i64>,
    pub role: Option<Role>,
    pub client_id: Option<i64>,
    pub branch_id: Option<i64>,
}

impl Actor {
    /// Fails with 403 unless the actor's role passes `allowed`.
    pub fn require(&self, allowed: fn(&Role) -> bool, action: &str) -> ApiResult<Role> {
        match self.role {
            Some(role) if allowed(&role) => Ok(role),
            _ => Err(ApiError::forbidden(action)),
        }
    }

    fn from_headers(headers: &HeaderMap) -> Result<Self, ValidationError> {
        let role = header_str(headers, ACTOR_ROLE_HEADER)?
            .map(str::parse::<Role>)
            .transpose()?;

        Ok(Actor {
            id: header_id(headers, ACTOR_ID_HEADER)?,
            role,
            client_id: header_id(headers, CLIENT_ID_HEADER)?,
            branch_id: header_id(headers, BRANCH_ID_HEADER)?,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ValidationError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|s| Some(s.trim()).filter(|s| !s.is_empty()))
            .map_err(|_| ValidationError::InvalidFormat {
                field: name.to_string(),
                reason: "header is not valid text".to_string(),
            }),
    }
}

fn header_id(headers: &HeaderMap, name: &str) -> Result<Option<i64>, ValidationError> {
    let Some(raw) = header_str(headers, name)? else {
        return Ok(None);
    };
    let id: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: name.to_string(),
        reason: "expected a numeric id".to_string(),
    })?;
    validate_id(name, id)?;
    Ok(Some(id))
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Actor::from_headers(&parts.headers)?)
    }
}

/// `axum::Json` whose rejection uses the API error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// `axum::extract::Path` whose rejection uses the API error body.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// `axum::extract::Query` whose rejection uses the API error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}
