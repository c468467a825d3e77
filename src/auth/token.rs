// JWT token generation and validation service

use crate::auth::{error::AuthError, models::AccountKind};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,          // account id
    pub kind: AccountKind,
    pub jti: Uuid,          // unique per issued token
    pub iat: i64,           // issued at timestamp
    pub exp: i64,           // expiration timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// One day, matching the lifetime of a login session
    pub const DEFAULT_DURATION_SECS: i64 = 86_400;

    /// Create a new TokenService with the default one-day lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_duration(secret, Self::DEFAULT_DURATION_SECS)
    }

    /// Create a new TokenService with an explicit lifetime in seconds
    pub fn with_duration(secret: &str, token_duration: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration,
        }
    }

    /// Token lifetime in seconds
    pub fn duration_secs(&self) -> i64 {
        self.token_duration
    }

    /// Sign a token for the given account
    pub fn generate_token(&self, kind: AccountKind, account_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account_id,
            kind,
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + self.token_duration,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Check signature and expiry, returning the claims on success
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}
