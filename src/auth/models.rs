//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::{ValidationResult, Validator};

/// JWT claims structure; the subject is the account email
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,
    pub credits: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

impl Validator<SignupRequest> for SignupRequest {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let email = data.email.trim();
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            result.add_error("email", "must be a valid email address");
        }
        if data.password.is_empty() {
            result.add_error("password", "must not be empty");
        }

        result
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}
