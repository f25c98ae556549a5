//! Session tokens for dashboard users
//!
//! Two HS256 tokens are issued on login:
//! - **Access tokens**: sent as `Authorization: Bearer` on every request
//! - **Refresh tokens**: exchanged at `/auth/refresh` for a fresh pair
//!
//! The signing secret comes from [`JwtConfig`]; every API instance sharing a
//! database must use the same secret.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{config::JwtConfig, entity::sea_orm_active_enums::UserRole};

// ============================================================================
// Token Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn audience(&self) -> &'static str {
        match self {
            TokenType::Access => "storage-metrics-access",
            TokenType::Refresh => "storage-metrics-refresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub typ: TokenType,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds
    pub expires_in: u64,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum AuthTokenError {
    EncodingError(String),
    DecodingError(String),
    TokenTypeMismatch { expected: TokenType, got: TokenType },
}

impl std::fmt::Display for AuthTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthTokenError::EncodingError(msg) => write!(f, "Failed to encode JWT: {}", msg),
            AuthTokenError::DecodingError(msg) => write!(f, "Failed to decode JWT: {}", msg),
            AuthTokenError::TokenTypeMismatch { expected, got } => write!(
                f,
                "Token type mismatch: expected {:?}, got {:?}",
                expected, got
            ),
        }
    }
}

impl std::error::Error for AuthTokenError {}

// ============================================================================
// Keys
// ============================================================================

pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    pub fn sign(
        &self,
        sub: &str,
        username: &str,
        role: UserRole,
        token_type: TokenType,
    ) -> Result<String, AuthTokenError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            username: username.to_string(),
            role,
            typ: token_type,
            iss: self.issuer.clone(),
            aud: token_type.audience().to_string(),
            iat,
            nbf: iat - 30, // clock skew
            exp: iat + self.ttl(token_type).as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthTokenError::EncodingError(e.to_string()))
    }

    /// Verifies signature, issuer, audience and expiry, then checks `typ`.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[expected.audience()]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthTokenError::DecodingError(e.to_string()))?
            .claims;

        if claims.typ != expected {
            return Err(AuthTokenError::TokenTypeMismatch {
                expected,
                got: claims.typ,
            });
        }

        Ok(claims)
    }

    pub fn issue_pair(
        &self,
        sub: &str,
        username: &str,
        role: UserRole,
    ) -> Result<TokenPair, AuthTokenError> {
        Ok(TokenPair {
            access_token: self.sign(sub, username, role, TokenType::Access)?,
            refresh_token: self.sign(sub, username, role, TokenType::Refresh)?,
            expires_in: self.access_ttl.as_secs(),
        })
    }
}
