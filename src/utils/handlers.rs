//! Utility handlers

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::common::{ApiError, AppState};

const IPINFO_URL: &str = "https://ipapi.co/json/";

/// GET /utils/ipinfo - Proxy a third-party IP geolocation lookup
pub async fn ipinfo(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let body = state
        .http
        .get(IPINFO_URL)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "ipinfo lookup failed");
            ApiError::InternalServer("ip lookup unavailable".to_string())
        })?
        .json::<serde_json::Value>()
        .await
        .map_err(|_| ApiError::InternalServer("ip lookup returned malformed data".to_string()))?;

    Ok(Json(body))
}
