//! User account handlers

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /users/me - Current account summary
pub async fn me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let (created_at,): (Option<String>,) =
        sqlx::query_as("SELECT created_at FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "id": user.id,
        "email": user.email,
        "credits": user.credits,
        "created_at": created_at,
    })))
}
