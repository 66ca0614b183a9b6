//! Publish record data models

use serde::Serialize;
use sqlx::FromRow;

/// Published post record, the durable evidence of one credit spent
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct PublishedPost {
    pub id: String,
    #[serde(skip_serializing)]
    pub user_id: String,
    #[serde(skip_serializing)]
    pub site_id: String,
    pub site_name: Option<String>,
    pub title: String,
    pub keyword: String,
    pub style: Option<String>,
    pub wp_post_url: String,
    pub has_image: bool,
    pub created_at: Option<String>,
}
