//! Request extractors whose rejections use the crate's error envelope.

use crate::errors::Error;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::{Deserialize, de::DeserializeOwned};

/// JSON body; malformed or mistyped bodies are a `Validation` error.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Error> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| Error::Validation {
                errors: vec![rejection.body_text()],
            })
    }
}

/// Query string; unparseable parameters are a `Validation` error.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Error> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| Error::Validation {
                errors: vec![rejection.body_text()],
            })
    }
}

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// `?skip=&limit=` with `skip >= 0` and `1 <= limit <= 1000`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub skip: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
struct RawPageParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

impl TryFrom<RawPageParams> for PageParams {
    type Error = Error;

    fn try_from(raw: RawPageParams) -> Result<Self, Error> {
        let mut errors = Vec::new();
        let skip = raw.skip.unwrap_or(0);
        let limit = raw.limit.unwrap_or(DEFAULT_LIMIT);
        if skip < 0 {
            errors.push("skip: must be greater than or equal to 0".to_string());
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            errors.push(format!("limit: must be between 1 and {MAX_LIMIT}"));
        }
        match (u64::try_from(skip), u64::try_from(limit)) {
            (Ok(skip), Ok(limit)) if errors.is_empty() => Ok(Self { skip, limit }),
            _ => Err(Error::Validation { errors }),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Error> {
        let Params(raw) = Params::<RawPageParams>::from_request_parts(parts, state).await?;
        Self::try_from(raw)
    }
}
