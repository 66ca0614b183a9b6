//! Password hashing, refresh tokens, and JWT helpers

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use tracing::{error, warn};

use super::models::Claims;
use crate::common::ApiError;

/// Hash a password (or refresh token) into a salted argon2id PHC string
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            ApiError::InternalServer("password hashing failed".to_string())
        })
}

/// Verify a plaintext value against a stored argon2 hash
pub fn verify_password(password: &str, hashed: &str) -> bool {
    PasswordHash::new(hashed)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Generate an opaque refresh token: 48 random bytes, base64url
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 48];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Create a signed HS256 access token with the account email as subject
pub fn create_access_token(
    email: &str,
    secret: &str,
    expire_minutes: i64,
) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::minutes(expire_minutes)).timestamp() as usize;
    let claims = Claims {
        sub: email.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "JWT encoding error");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Decode and verify an access token, returning its claims
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("invalid or expired token".to_string())
    })
}
