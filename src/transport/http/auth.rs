//! Caller identity.
//!
//! Token issuance and verification live outside this service; handlers only need to
//! know who the caller is and whether they are an admin. [`Authenticator`] is that
//! seam, and [`HeaderAuthenticator`] trusts identity headers set by a fronting gateway.

use crate::transport::http::types::{AppState, MessageResponse};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Accepts the numeric role codes (`0`, `1`) as well as `user`/`admin`.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "0" | "user" => Some(Role::User),
            "1" | "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

pub trait Authenticator: Send + Sync {
    /// `None` when the request carries no acceptable identity.
    fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;
}

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads `X-User-Id` and `X-User-Role`. A missing role means a regular user.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderAuthenticator;

impl Authenticator for HeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let user_id = headers.get(USER_ID_HEADER)?.to_str().ok()?;
        let user_id = Uuid::parse_str(user_id.trim()).ok()?;
        let role = match headers.get(USER_ROLE_HEADER) {
            Some(v) => Role::parse(v.to_str().ok()?)?,
            None => Role::User,
        };
        Some(Principal { user_id, role })
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(MessageResponse::failed(message))).into_response()
}

/// Any authenticated caller.
pub struct RequireSignIn(pub Principal);

/// An authenticated caller with the admin role.
pub struct RequireAdmin(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for RequireSignIn {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .authenticator
            .authenticate(&parts.headers)
            .map(RequireSignIn)
            .ok_or_else(|| unauthorized("Sign in required"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = state
            .authenticator
            .authenticate(&parts.headers)
            .ok_or_else(|| unauthorized("Sign in required"))?;
        if principal.role != Role::Admin {
            tracing::warn!(user_id = %principal.user_id, "admin route refused");
            return Err(unauthorized("UnAuthorized Access"));
        }
        Ok(RequireAdmin(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn missing_or_malformed_id_is_anonymous() {
        assert_eq!(HeaderAuthenticator.authenticate(&headers(&[])), None);
        assert_eq!(
            HeaderAuthenticator.authenticate(&headers(&[(USER_ID_HEADER, "nope")])),
            None
        );
    }

    #[test]
    fn role_defaults_to_user() {
        let id = Uuid::new_v4();
        let p = HeaderAuthenticator
            .authenticate(&headers(&[(USER_ID_HEADER, &id.to_string())]))
            .unwrap();
        assert_eq!(p, Principal { user_id: id, role: Role::User });
    }

    #[test]
    fn numeric_and_named_roles() {
        assert_eq!(Role::parse("1"), Some(Role::Admin));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("0"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
    }
}
