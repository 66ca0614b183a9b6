//! Connected site handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{AddSiteRequest, MessageResponse, Site};
use super::probe::{self, ProbeError};
use crate::auth::AuthedUser;
use crate::common::{generate_site_id, ApiError, AppState, Validator};

/// GET /sites/ - List all sites for the authenticated account
pub async fn list_sites(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<Vec<Site>>, ApiError> {
    let state = state_lock.read().await.clone();

    let sites = sqlx::query_as::<_, Site>("SELECT * FROM wp_sites WHERE user_id = ?")
        .bind(&user.id)
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(sites))
}

/// GET /sites/:id - Single site detail
pub async fn get_site(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(site_id): Path<String>,
) -> Result<Json<Site>, ApiError> {
    let state = state_lock.read().await.clone();

    let site = fetch_owned_site(&state, &site_id, &user.id).await?;

    Ok(Json(site))
}

/// POST /sites/add - Register a new site
///
/// The connectivity probe must succeed before anything is persisted; the
/// application password is stored only in encrypted form.
pub async fn add_site(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(payload): Json<AddSiteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = payload.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let wp_url = payload.wp_url.trim().trim_end_matches('/').to_string();

    let duplicate: Option<(String,)> =
        sqlx::query_as("SELECT id FROM wp_sites WHERE user_id = ? AND wp_url = ?")
            .bind(&user.id)
            .bind(&wp_url)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    if duplicate.is_some() {
        return Err(ApiError::BadRequest("Site already added".to_string()));
    }

    if let Err(e) = probe::check_connection(
        &state.http,
        &wp_url,
        &payload.wp_user,
        &payload.wp_app_pass,
    )
    .await
    {
        warn!(error = %e, url = %wp_url, "site registration probe failed");
        return Err(match e {
            ProbeError::InvalidCredentials => {
                ApiError::BadRequest("Invalid WordPress credentials".to_string())
            }
            _ => ApiError::BadRequest(
                "Site unreachable or not a WordPress REST endpoint".to_string(),
            ),
        });
    }

    let encrypted_pass = state
        .crypto
        .encrypt(&payload.wp_app_pass)
        .map_err(|_| ApiError::CryptoFailure)?;

    let site_id = generate_site_id();

    sqlx::query(
        r#"
        INSERT INTO wp_sites (id, user_id, wp_url, wp_user, wp_app_pass_enc, style, site_name)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&site_id)
    .bind(&user.id)
    .bind(&wp_url)
    .bind(&payload.wp_user)
    .bind(&encrypted_pass)
    .bind(&payload.style)
    .bind(&payload.site_name)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(site_id = %site_id, user_id = %user.id, "Site connected");

    let site = fetch_owned_site(&state, &site_id, &user.id).await?;

    Ok((StatusCode::CREATED, Json(site)))
}

/// DELETE /sites/:id - Remove a site
pub async fn delete_site(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(site_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    // Confirms ownership before deleting
    fetch_owned_site(&state, &site_id, &user.id).await?;

    sqlx::query("DELETE FROM wp_sites WHERE id = ? AND user_id = ?")
        .bind(&site_id)
        .bind(&user.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(site_id = %site_id, user_id = %user.id, "Site deleted");

    Ok(Json(MessageResponse {
        message: "Site deleted successfully".to_string(),
    }))
}

/// Fetch a site scoped to its owning account, 404 otherwise
async fn fetch_owned_site(
    state: &AppState,
    site_id: &str,
    user_id: &str,
) -> Result<Site, ApiError> {
    sqlx::query_as::<_, Site>("SELECT * FROM wp_sites WHERE id = ? AND user_id = ?")
        .bind(site_id)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Site not found".to_string()))
}
