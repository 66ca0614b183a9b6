//! Tests for sites module
//!
//! These tests verify core site functionality including:
//! - Site model serialization (the encrypted password must never leak)
//! - Registration request validation

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    #[test]
    fn test_site_response_hides_encrypted_password() {
        let site = models::Site {
            id: "S_K7NP3X".to_string(),
            user_id: "U_8MWQT2".to_string(),
            wp_url: "https://example.com".to_string(),
            wp_user: "editor".to_string(),
            wp_app_pass_enc: "base64-vault-token".to_string(),
            style: Some("seo".to_string()),
            site_name: Some("Example Blog".to_string()),
            created_at: Some("2025-01-01 00:00:00".to_string()),
        };

        let json = serde_json::to_value(&site).unwrap();
        assert!(json.get("wp_app_pass_enc").is_none());
        assert_eq!(json["wp_url"], "https://example.com");
        assert_eq!(json["site_name"], "Example Blog");
    }

    #[test]
    fn test_add_site_validation_success() {
        let request = models::AddSiteRequest {
            wp_url: "https://example.com".to_string(),
            wp_user: "editor".to_string(),
            wp_app_pass: "xxxx yyyy zzzz".to_string(),
            style: Some("casual".to_string()),
            site_name: None,
        };

        assert!(request.validate(&request).is_valid);
    }

    #[test]
    fn test_add_site_validation_rejects_bad_url() {
        let request = models::AddSiteRequest {
            wp_url: "ftp://example.com".to_string(),
            wp_user: "editor".to_string(),
            wp_app_pass: "xxxx".to_string(),
            style: None,
            site_name: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "wp_url"));
    }

    #[test]
    fn test_add_site_validation_rejects_empty_credentials() {
        let request = models::AddSiteRequest {
            wp_url: "https://example.com".to_string(),
            wp_user: "   ".to_string(),
            wp_app_pass: "".to_string(),
            style: None,
            site_name: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "wp_user"));
        assert!(result.errors.iter().any(|e| e.field == "wp_app_pass"));
    }
}
