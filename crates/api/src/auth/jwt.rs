//! HS256 access-token validation.
//!
//! Tokens carry the profile id in `sub` and the profile role in `role`.
//! [`issue_token`] exists for tooling and tests that need a valid token
//! without going through the auth provider.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use souq_core::error::CoreError;
use souq_core::roles::Role;
use souq_core::types::DbId;
use uuid::Uuid;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Profile id.
    pub sub: DbId,
    /// Role name, one of [`souq_core::roles::VALID_ROLES`].
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Lifetime of tokens minted by [`issue_token`].
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load from `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default `60`).
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|raw| {
                raw.parse()
                    .unwrap_or_else(|e| panic!("JWT_ACCESS_EXPIRY_MINS must be an integer: {e}"))
            })
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Mint a token for `user_id` with the given role.
pub fn issue_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.as_str().to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry and return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
