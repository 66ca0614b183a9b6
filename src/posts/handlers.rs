//! Publish record handlers

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::PublishedPost;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /posts/ - List the account's publish records, most recent first
pub async fn list_posts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<Vec<PublishedPost>>, ApiError> {
    let state = state_lock.read().await.clone();

    let posts = sqlx::query_as::<_, PublishedPost>(
        "SELECT * FROM posts WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(posts))
}
