//! Connected site data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::{ValidationResult, Validator};

/// Connected WordPress site database model
///
/// The encrypted application password never serializes into API responses.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Site {
    pub id: String,
    pub user_id: String,
    pub wp_url: String,
    pub wp_user: String,
    #[serde(skip_serializing)]
    pub wp_app_pass_enc: String,
    pub style: Option<String>,
    pub site_name: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
pub struct AddSiteRequest {
    pub wp_url: String,
    pub wp_user: String,
    pub wp_app_pass: String,
    pub style: Option<String>,
    pub site_name: Option<String>,
}

impl Validator<AddSiteRequest> for AddSiteRequest {
    fn validate(&self, data: &AddSiteRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let url = data.wp_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error("wp_url", "must be an http(s) URL");
        }
        if data.wp_user.trim().is_empty() {
            result.add_error("wp_user", "must not be empty");
        }
        if data.wp_app_pass.is_empty() {
            result.add_error("wp_app_pass", "must not be empty");
        }

        result
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
