use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Configuration;

const DEFAULT_SECRET: &str = "digital-lurker-insecure-secret";
const DEFAULT_ACCESS_MINUTES: i64 = 5;
const DEFAULT_REFRESH_DAYS: i64 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub user_id: Uuid,
}

/// HS256 access/refresh token issuer and validator.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_lifetime: Duration, refresh_lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_lifetime,
            refresh_lifetime,
        }
    }

    pub fn from_config(config: &Configuration) -> Self {
        let secret = match config.get("jwt.secret") {
            Some(secret) => secret,
            None => {
                log::warn!("jwt.secret is not configured, falling back to an insecure default");
                DEFAULT_SECRET
            }
        };
        let access_minutes = config.parse_or("jwt.access_minutes", DEFAULT_ACCESS_MINUTES);
        let refresh_days = config.parse_or("jwt.refresh_days", DEFAULT_REFRESH_DAYS);
        Self::new(
            secret,
            Duration::minutes(access_minutes),
            Duration::days(refresh_days),
        )
    }

    pub fn create_access_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, TokenType::Access, self.access_lifetime)
    }

    pub fn create_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, TokenType::Refresh, self.refresh_lifetime)
    }

    /// Decodes and checks signature, expiry and the expected token type.
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow!("invalid token: {}", e))?;
        if data.claims.token_type != expected {
            return Err(anyhow!("wrong token type"));
        }
        Ok(data.claims)
    }

    fn issue(&self, user_id: Uuid, token_type: TokenType, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            token_type,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
            user_id,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow!("token encoding failed: {}", e))
    }
}
