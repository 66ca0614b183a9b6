//! Tests for the content module
//!
//! The settle stage is the only place the workflow mutates persistent
//! state, so its atomicity properties are exercised directly against an
//! in-memory database.

#[cfg(test)]
mod tests {
    use super::super::models::AutoPublishRequest;
    use super::super::workflow::{settle_publish, PublishError, SettleParams};
    use crate::common::migrations;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        pool
    }

    async fn seed_account(pool: &SqlitePool, id: &str, credits: i64) {
        sqlx::query("INSERT INTO users (id, email, hashed_password, credits) VALUES (?, ?, 'x', ?)")
            .bind(id)
            .bind(format!("{}@example.com", id))
            .bind(credits)
            .execute(pool)
            .await
            .expect("seed account");
    }

    async fn seed_site(pool: &SqlitePool, id: &str, user_id: &str) {
        sqlx::query(
            "INSERT INTO wp_sites (id, user_id, wp_url, wp_user, wp_app_pass_enc, site_name) \
             VALUES (?, ?, 'https://example.com', 'editor', 'token', 'Example Blog')",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("seed site");
    }

    async fn credits_of(pool: &SqlitePool, user_id: &str) -> i64 {
        let (credits,): (i64,) = sqlx::query_as("SELECT credits FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .expect("credits");
        credits
    }

    async fn record_count(pool: &SqlitePool, user_id: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .expect("count");
        count
    }

    fn params<'a>(user_id: &'a str, site_id: &'a str) -> SettleParams<'a> {
        SettleParams {
            user_id,
            site_id,
            site_name: Some("Example Blog"),
            title: "Best Coffee Makers of 2025",
            keyword: "best coffee makers",
            style: "seo",
            wp_post_url: "https://example.com/?p=42",
            has_image: false,
        }
    }

    #[tokio::test]
    async fn test_settle_debits_and_records_together() {
        let pool = test_pool().await;
        seed_account(&pool, "U_AAAAAA", 5).await;
        seed_site(&pool, "S_AAAAAA", "U_AAAAAA").await;

        let remaining = settle_publish(&pool, &params("U_AAAAAA", "S_AAAAAA"))
            .await
            .expect("settle");

        assert_eq!(remaining, 4);
        assert_eq!(credits_of(&pool, "U_AAAAAA").await, 4);
        assert_eq!(record_count(&pool, "U_AAAAAA").await, 1);

        // Record fields reference the right account and site
        let (site_id, keyword, url, has_image): (String, String, String, bool) = sqlx::query_as(
            "SELECT site_id, keyword, wp_post_url, has_image FROM posts WHERE user_id = ?",
        )
        .bind("U_AAAAAA")
        .fetch_one(&pool)
        .await
        .expect("record");

        assert_eq!(site_id, "S_AAAAAA");
        assert_eq!(keyword, "best coffee makers");
        assert_eq!(url, "https://example.com/?p=42");
        assert!(!has_image);
    }

    #[tokio::test]
    async fn test_settle_rejects_empty_balance_with_no_side_effects() {
        let pool = test_pool().await;
        seed_account(&pool, "U_BBBBBB", 0).await;
        seed_site(&pool, "S_BBBBBB", "U_BBBBBB").await;

        let result = settle_publish(&pool, &params("U_BBBBBB", "S_BBBBBB")).await;

        assert!(matches!(result, Err(PublishError::InsufficientCredits)));
        assert_eq!(credits_of(&pool, "U_BBBBBB").await, 0);
        assert_eq!(record_count(&pool, "U_BBBBBB").await, 0);
    }

    #[tokio::test]
    async fn test_last_credit_can_only_be_spent_once() {
        let pool = test_pool().await;
        seed_account(&pool, "U_CCCCCC", 1).await;
        seed_site(&pool, "S_CCCCCC", "U_CCCCCC").await;

        let first = settle_publish(&pool, &params("U_CCCCCC", "S_CCCCCC")).await;
        assert_eq!(first.expect("first settle"), 0);

        // A second settle against the same balance loses the conditional
        // decrement and leaves exactly one record behind
        let second = settle_publish(&pool, &params("U_CCCCCC", "S_CCCCCC")).await;
        assert!(matches!(second, Err(PublishError::InsufficientCredits)));

        assert_eq!(credits_of(&pool, "U_CCCCCC").await, 0);
        assert_eq!(record_count(&pool, "U_CCCCCC").await, 1);
    }

    #[test]
    fn test_auto_publish_request_defaults() {
        let request: AutoPublishRequest =
            serde_json::from_str(r#"{"keyword": "best coffee makers", "site_id": "S_AAAAAA"}"#)
                .expect("deserialize");

        assert_eq!(request.style, "formal");
        assert!(request.with_image);
        assert_eq!(request.keyword, "best coffee makers");
    }
}
