use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use crate::dtos::auth_dtos::{
    TokenObtainRequest, TokenPairResponse, TokenRefreshRequest, TokenRefreshResponse,
};
use crate::entities::User;
use crate::http_error::{FieldErrors, HttpError, HttpResult};
use crate::repositories::UserRepository;
use crate::services::token_service::TokenType;
use crate::services::validation::REQUIRED;
use crate::services::{PasswordService, TokenService};

const NO_ACTIVE_ACCOUNT: &str = "No active account found with the given credentials";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: PasswordService, tokens: TokenService) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn obtain(&self, request: TokenObtainRequest) -> HttpResult<TokenPairResponse> {
        let mut errors = FieldErrors::new();
        if request.username.as_deref().is_none_or(str::is_empty) {
            errors.add("username", REQUIRED);
        }
        if request.password.as_deref().is_none_or(str::is_empty) {
            errors.add("password", REQUIRED);
        }
        errors.into_result()?;

        let username = request.username.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let user = self
            .users
            .get_by_username(&username)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| HttpError::detail(StatusCode::UNAUTHORIZED, NO_ACTIVE_ACCOUNT))?;

        if !self.passwords.verify(&password, &user.password_hash)? {
            log::warn!("Failed login attempt for {}", username);
            return Err(HttpError::detail(StatusCode::UNAUTHORIZED, NO_ACTIVE_ACCOUNT));
        }

        log::info!("Issued token pair for {}", user.username);
        Ok(TokenPairResponse {
            refresh: self.tokens.create_refresh_token(user.public_id)?,
            access: self.tokens.create_access_token(user.public_id)?,
        })
    }

    pub fn refresh(&self, request: TokenRefreshRequest) -> HttpResult<TokenRefreshResponse> {
        let Some(refresh) = request.refresh.filter(|token| !token.is_empty()) else {
            return Err(HttpError::field("refresh", REQUIRED));
        };

        let claims = self
            .tokens
            .validate(&refresh, TokenType::Refresh)
            .map_err(|e| {
                log::debug!("Rejected refresh token: {}", e);
                token_not_valid("Token is invalid or expired")
            })?;

        Ok(TokenRefreshResponse {
            access: self.tokens.create_access_token(claims.user_id)?,
        })
    }

    /// Resolves the user behind an access token.
    pub async fn authenticate(&self, access_token: &str) -> HttpResult<User> {
        let claims = self
            .tokens
            .validate(access_token, TokenType::Access)
            .map_err(|e| {
                log::debug!("Rejected access token: {}", e);
                token_not_valid("Given token not valid for any token type")
            })?;

        self.users
            .get_by_public_id(claims.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                HttpError::new(
                    StatusCode::UNAUTHORIZED,
                    json!({ "detail": "User not found", "code": "user_not_found" }),
                )
            })
    }
}

fn token_not_valid(detail: &str) -> HttpError {
    HttpError::new(
        StatusCode::UNAUTHORIZED,
        json!({ "detail": detail, "code": "token_not_valid" }),
    )
}
