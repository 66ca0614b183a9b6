//! Content handlers

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

use super::models::{AutoPublishRequest, AutoPublishResponse};
use super::workflow::{self, PublishError};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, Validator};

/// POST /content/auto-publish
/// Generate an article (and optional image) and publish it to one of the
/// account's connected sites, spending one credit on success
pub async fn auto_publish(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(payload): Json<AutoPublishRequest>,
) -> Result<Json<AutoPublishResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = payload.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let response = workflow::run_auto_publish(&state, &user.id, &payload)
        .await
        .map_err(|e| match e {
            PublishError::InsufficientCredits => ApiError::InsufficientCredits,
            PublishError::SiteNotFound => ApiError::NotFound("Site not found".to_string()),
            PublishError::Generation => ApiError::GenerationFailed,
            PublishError::Publish(source) => {
                error!(error = %source, "publish adapter failed");
                ApiError::PublishFailed
            }
            PublishError::Crypto(source) => {
                error!(error = %source, "credential decryption failed");
                ApiError::CryptoFailure
            }
            PublishError::Database(source) => ApiError::DatabaseError(source),
        })?;

    Ok(Json(response))
}
