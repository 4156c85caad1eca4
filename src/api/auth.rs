//! HTTP Basic authentication for mutating endpoints.

use super::AppState;
use crate::errors::Error;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use base64::{Engine, engine::general_purpose::STANDARD};

/// The authenticated user name. Taking it as a handler argument makes the
/// route require valid credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let (username, password) = basic_credentials(&parts.headers).ok_or(Error::Unauthorized)?;
        if username == state.config.basic_auth_username
            && password == state.config.basic_auth_password
        {
            Ok(Self(username))
        } else {
            tracing::warn!("Rejected credentials for user '{}'", username);
            Err(Error::Unauthorized)
        }
    }
}

/// Decodes `Authorization: Basic <base64(user:password)>`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
