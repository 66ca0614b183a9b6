//! Auto-publish workflow
//!
//! Stage order: credit check → site lookup → article generation →
//! (optional image generation) → publish → settle. External failures before
//! the settle stage leave the credit balance and the record table untouched;
//! the settle stage commits the debit and the audit record in a single
//! transaction.

use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{AutoPublishRequest, AutoPublishResponse};
use crate::common::{generate_post_id, AppState};
use crate::services::crypto::CryptoError;
use crate::services::wordpress::WordPressError;
use crate::sites::Site;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("insufficient credits")]
    InsufficientCredits,

    #[error("site not found")]
    SiteNotFound,

    #[error("article generation failed")]
    Generation,

    #[error("publishing failed: {0}")]
    Publish(#[from] WordPressError),

    #[error("credential decryption failed")]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Run the full auto-publish workflow for one request
pub async fn run_auto_publish(
    state: &AppState,
    user_id: &str,
    req: &AutoPublishRequest,
) -> Result<AutoPublishResponse, PublishError> {
    // CreditCheck: fast path so no generation cost is spent on an empty
    // balance. The settle stage re-checks atomically.
    let (credits,): (i64,) = sqlx::query_as("SELECT credits FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;

    if credits < 1 {
        return Err(PublishError::InsufficientCredits);
    }

    // SiteLookup: the target must exist and belong to the requester
    let site: Site = sqlx::query_as("SELECT * FROM wp_sites WHERE id = ? AND user_id = ?")
        .bind(&req.site_id)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(PublishError::SiteNotFound)?;

    // Generating
    let article = state
        .openai
        .generate_article(&req.keyword, &req.style)
        .await
        .map_err(|e| {
            warn!(error = %e, keyword = %req.keyword, "article generation failed");
            PublishError::Generation
        })?;

    // ImageGenerating: best-effort, failure degrades to no image
    let image_b64 = if req.with_image {
        state.openai.generate_image(&req.keyword).await
    } else {
        None
    };
    let has_image = image_b64.is_some();

    // Publishing: nothing has been spent up to this point, so a failure
    // here costs the user nothing
    let app_pass = state.crypto.decrypt(&site.wp_app_pass_enc)?;

    let url = state
        .wordpress
        .publish(
            &site.wp_url,
            &site.wp_user,
            &app_pass,
            &article.title,
            &article.content,
            image_b64.as_deref(),
        )
        .await?;

    // Settling
    let remaining_credits = settle_publish(
        &state.db,
        &SettleParams {
            user_id,
            site_id: &site.id,
            site_name: site.site_name.as_deref(),
            title: &article.title,
            keyword: &req.keyword,
            style: &req.style,
            wp_post_url: &url,
            has_image,
        },
    )
    .await?;

    info!(
        user_id = %user_id,
        site_id = %site.id,
        url = %url,
        remaining_credits = remaining_credits,
        "auto-publish completed"
    );

    Ok(AutoPublishResponse {
        url,
        title: article.title,
        site: site.site_name,
        has_image,
        remaining_credits,
    })
}

pub struct SettleParams<'a> {
    pub user_id: &'a str,
    pub site_id: &'a str,
    pub site_name: Option<&'a str>,
    pub title: &'a str,
    pub keyword: &'a str,
    pub style: &'a str,
    pub wp_post_url: &'a str,
    pub has_image: bool,
}

/// Commit one credit debit and one publish record as a single unit.
///
/// The decrement is conditional (`credits >= 1`), so two requests racing
/// past the read-side check cannot drive the balance below zero: the loser
/// rolls back with `InsufficientCredits` and no record. Returns the
/// remaining balance after the debit.
pub async fn settle_publish(
    db: &SqlitePool,
    params: &SettleParams<'_>,
) -> Result<i64, PublishError> {
    let mut tx = db.begin().await?;

    let debited = sqlx::query(
        "UPDATE users SET credits = credits - 1, updated_at = datetime('now') \
         WHERE id = ? AND credits >= 1",
    )
    .bind(params.user_id)
    .execute(&mut *tx)
    .await?;

    if debited.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(PublishError::InsufficientCredits);
    }

    sqlx::query(
        r#"
        INSERT INTO posts (id, user_id, site_id, site_name, title, keyword, style, wp_post_url, has_image)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(generate_post_id())
    .bind(params.user_id)
    .bind(params.site_id)
    .bind(params.site_name)
    .bind(params.title)
    .bind(params.keyword)
    .bind(params.style)
    .bind(params.wp_post_url)
    .bind(params.has_image)
    .execute(&mut *tx)
    .await?;

    let (remaining,): (i64,) = sqlx::query_as("SELECT credits FROM users WHERE id = ?")
        .bind(params.user_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(remaining)
}
