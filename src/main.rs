// src/main.rs
use axum::{extract::Extension, middleware, routing::get, Json, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod content;
mod logging_middleware;
mod posts;
mod services;
mod sites;
mod users;
mod utils;

use common::state::GoogleOAuthConfig;
use common::AppState;
use services::openai::OpenAiConfig;
use services::{CryptoService, OpenAiService, WordPressService};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rankpost.db".to_string());
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
    let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(120);
    let signup_credits = env::var("SIGNUP_CREDITS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(5);
    let frontend_callback_url = env::var("FRONTEND_CALLBACK_URL")
        .unwrap_or_else(|_| "http://localhost:3000/callback".to_string());

    // The credential vault cannot run without its key
    let encryption_key = env::var("ENCRYPTION_MASTER_KEY")
        .map_err(|_| anyhow::anyhow!("ENCRYPTION_MASTER_KEY must be set (see generate_encryption_key)"))?;
    let crypto = Arc::new(CryptoService::from_key(&encryption_key)?);
    info!("CryptoService initialized");

    let openai_config = OpenAiConfig {
        api_key: env::var("OPENAI_API_KEY").ok(),
        base_url: env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string()),
        model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        image_model: env::var("OPENAI_IMAGE_MODEL").unwrap_or_else(|_| "gpt-image-1".to_string()),
    };
    if openai_config.api_key.is_none() {
        warn!("OPENAI_API_KEY not set - article generation will fail until configured");
    }

    let google_oauth = match (
        env::var("GOOGLE_CLIENT_ID").ok(),
        env::var("GOOGLE_CLIENT_SECRET").ok(),
        env::var("GOOGLE_REDIRECT_URI").ok(),
    ) {
        (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(GoogleOAuthConfig {
            client_id,
            client_secret,
            redirect_uri,
        }),
        _ => {
            warn!("Google OAuth not fully configured - social login disabled");
            None
        }
    };

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let openai_service = Arc::new(OpenAiService::new(openai_config));
    info!("OpenAiService initialized");

    let wordpress_service = Arc::new(WordPressService::new());
    info!("WordPressService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        http: http_client,
        jwt_secret,
        access_token_expire_minutes,
        signup_credits,
        frontend_callback_url,
        google_oauth,
        crypto,
        openai: openai_service,
        wordpress: wordpress_service,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .route("/", get(root))
        .merge(auth::auth_routes())
        .merge(sites::sites_routes())
        .merge(content::content_routes())
        .merge(posts::posts_routes())
        .merge(users::users_routes())
        .merge(utils::utils_routes())
        // Request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared.clone()))
        .layer({
            let cors_origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://127.0.0.1:3000".to_string()
            });

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// GET / - liveness body
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "app": "rankpost-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
