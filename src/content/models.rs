//! Auto-publish request and response models

use serde::{Deserialize, Serialize};

use crate::common::{ValidationResult, Validator};

#[derive(Deserialize)]
pub struct AutoPublishRequest {
    pub keyword: String,
    #[serde(default = "default_style")]
    pub style: String,
    pub site_id: String,
    #[serde(default = "default_with_image")]
    pub with_image: bool,
}

fn default_style() -> String {
    "formal".to_string()
}

fn default_with_image() -> bool {
    true
}

impl Validator<AutoPublishRequest> for AutoPublishRequest {
    fn validate(&self, data: &AutoPublishRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.keyword.trim().is_empty() {
            result.add_error("keyword", "must not be empty");
        }
        if data.site_id.trim().is_empty() {
            result.add_error("site_id", "must not be empty");
        }

        result
    }
}

#[derive(Serialize, Debug)]
pub struct AutoPublishResponse {
    pub url: String,
    pub title: String,
    pub site: Option<String>,
    pub has_image: bool,
    pub remaining_credits: i64,
}
