// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{CryptoService, OpenAiService, WordPressService};

/// Google OAuth client configuration, absent when social login is disabled
#[derive(Clone, Debug)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub signup_credits: i64,
    pub frontend_callback_url: String,
    pub google_oauth: Option<GoogleOAuthConfig>,
    pub crypto: Arc<CryptoService>,
    pub openai: Arc<OpenAiService>,
    pub wordpress: Arc<WordPressService>,
}
