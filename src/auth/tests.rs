//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - JWT token creation and validation
//! - Password and refresh-token hashing
//! - Request validation

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    #[test]
    fn test_claims_structure() {
        let claims = models::Claims {
            sub: "user@example.com".to_string(),
            exp: 1234567890,
        };

        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.exp, 1234567890);
    }

    #[test]
    fn test_access_token_round_trip() {
        let secret = "test_secret_key";
        let token = security::create_access_token("user@example.com", secret, 120)
            .expect("Failed to create token");

        let claims = security::verify_access_token(&token, secret)
            .expect("Failed to verify token");

        assert_eq!(claims.sub, "user@example.com");
    }

    #[test]
    fn test_access_token_fails_with_wrong_secret() {
        let token = security::create_access_token("user@example.com", "secret_a", 120)
            .expect("Failed to create token");

        let result = security::verify_access_token(&token, "secret_b");
        assert!(
            result.is_err(),
            "Token validation should fail with wrong secret"
        );
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = security::hash_password("hunter2-but-longer").unwrap();

        assert!(security::verify_password("hunter2-but-longer", &hash));
        assert!(!security::verify_password("wrong-password", &hash));
        // Garbage stored hashes never verify
        assert!(!security::verify_password("hunter2-but-longer", "not-a-phc-string"));
    }

    #[test]
    fn test_password_hashing_is_salted() {
        let hash1 = security::hash_password("same-password").unwrap();
        let hash2 = security::hash_password("same-password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(security::verify_password("same-password", &hash1));
        assert!(security::verify_password("same-password", &hash2));
    }

    #[test]
    fn test_refresh_tokens_are_opaque_and_unique() {
        let token1 = security::generate_refresh_token();
        let token2 = security::generate_refresh_token();

        assert_ne!(token1, token2);
        // 48 random bytes base64url-encoded without padding
        assert_eq!(token1.len(), 64);

        // The stored hash verifies the original token only
        let hash = security::hash_password(&token1).unwrap();
        assert!(security::verify_password(&token1, &hash));
        assert!(!security::verify_password(&token2, &hash));
    }

    #[test]
    fn test_signup_validation() {
        let valid = models::SignupRequest {
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate(&valid).is_valid);

        let bad_email = models::SignupRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        let result = bad_email.validate(&bad_email);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "email"));

        let empty_password = models::SignupRequest {
            email: "user@example.com".to_string(),
            password: "".to_string(),
        };
        let result = empty_password.validate(&empty_password);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn test_token_response_shape() {
        let tokens = models::TokenResponse::new("access".to_string(), "refresh".to_string());
        assert_eq!(tokens.token_type, "bearer");
        assert_eq!(tokens.access_token, "access");
        assert_eq!(tokens.refresh_token, "refresh");
    }
}
