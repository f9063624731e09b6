use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app::AppState;
use crate::entities::User;
use crate::http_error::{HttpError, HttpResult};

/// The caller behind the `Authorization: Bearer` header, if any.
///
/// A missing header yields an anonymous identity. A header that is present
/// but does not carry a valid access token rejects the request with 401.
#[derive(Debug, Clone)]
pub struct Identity(pub Option<User>);

impl Identity {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn require_authenticated(&self) -> HttpResult<&User> {
        self.0.as_ref().ok_or_else(HttpError::not_authenticated)
    }

    pub fn require_admin(&self) -> HttpResult<&User> {
        let user = self.require_authenticated()?;
        if !user.is_staff {
            log::debug!("User {} is not an admin", user.username);
            return Err(HttpError::forbidden());
        }
        Ok(user)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> HttpResult<Self> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Identity(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                HttpError::detail(
                    axum::http::StatusCode::UNAUTHORIZED,
                    "Authorization header must contain two space-delimited values",
                )
            })?;

        let user = state.auth.authenticate(token).await?;
        Ok(Identity(Some(user)))
    }
}
