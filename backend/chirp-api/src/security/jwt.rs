use anyhow::{anyhow, Result};
/// JWT token generation and validation using HS256
/// Access tokens: 1-hour expiry
/// Refresh tokens: 30-day expiry
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Username
    pub username: String,
}

/// Token pair returned on register/login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

use std::sync::RwLock;

// Thread-safe storage for JWT keys derived from the configured secret
lazy_static! {
    static ref JWT_KEYS: RwLock<Option<(EncodingKey, DecodingKey)>> = RwLock::new(None);
}

/// Initialize JWT keys from the shared HMAC secret.
/// Must be called during application startup before any JWT operations.
pub fn initialize_keys(secret: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut keys = JWT_KEYS
        .write()
        .map_err(|e| anyhow!("Failed to acquire write lock on JWT keys: {}", e))?;
    *keys = Some((encoding_key, decoding_key));

    Ok(())
}

fn get_encoding_key() -> Result<EncodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;

    keys.as_ref()
        .map(|(enc, _)| enc.clone())
        .ok_or_else(|| anyhow!("JWT keys not initialized. Call initialize_keys() during startup"))
}

fn get_decoding_key() -> Result<DecodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;

    keys.as_ref()
        .map(|(_, dec)| dec.clone())
        .ok_or_else(|| anyhow!("JWT keys not initialized. Call initialize_keys() during startup"))
}

fn generate_token(user_id: Uuid, username: &str, token_type: &str, expiry: Duration) -> Result<String> {
    let now = Utc::now();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expiry).timestamp(),
        token_type: token_type.to_string(),
        username: username.to_string(),
    };

    let encoding_key = get_encoding_key()?;
    encode(
        &Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &encoding_key,
    )
    .map_err(|e| anyhow!("Failed to generate {} token: {}", token_type, e))
}

/// Generate a new access token
pub fn generate_access_token(user_id: Uuid, username: &str) -> Result<String> {
    generate_token(
        user_id,
        username,
        "access",
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )
}

/// Generate a new refresh token
pub fn generate_refresh_token(user_id: Uuid, username: &str) -> Result<String> {
    generate_token(
        user_id,
        username,
        "refresh",
        Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
    )
}

/// Generate the access/refresh pair returned by the auth endpoints
pub fn generate_token_pair(user_id: Uuid, username: &str) -> Result<TokenResponse> {
    Ok(TokenResponse {
        access_token: generate_access_token(user_id, username)?,
        refresh_token: generate_refresh_token(user_id, username)?,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

/// Validate a token's signature and expiry, returning its claims
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;
    decode::<Claims>(
        token,
        &decoding_key,
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .map_err(|e| anyhow!("Token validation failed: {}", e))
}

/// Validate an access token specifically; refresh tokens are rejected here
pub fn validate_access_token(token: &str) -> Result<TokenData<Claims>> {
    let data = validate_token(token)?;
    if data.claims.token_type != "access" {
        return Err(anyhow!("Expected access token, got {}", data.claims.token_type));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        initialize_keys("unit-test-secret").expect("keys should initialize");
    }

    #[test]
    fn access_token_round_trip() {
        init();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "alice").expect("should generate");
        let data = validate_access_token(&token).expect("should validate");
        assert_eq!(data.claims.sub, user_id.to_string());
        assert_eq!(data.claims.username, "alice");
        assert_eq!(data.claims.token_type, "access");
    }

    #[test]
    fn refresh_token_is_rejected_as_access() {
        init();
        let token = generate_refresh_token(Uuid::new_v4(), "alice").expect("should generate");
        assert!(validate_access_token(&token).is_err());
    }

    #[test]
    fn tampered_token_fails_validation() {
        init();
        let mut token = generate_access_token(Uuid::new_v4(), "alice").expect("should generate");
        token.push('x');
        assert!(validate_token(&token).is_err());
    }
}
