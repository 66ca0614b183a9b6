// src/services/crypto.rs
//! Credential vault for WordPress application passwords.
//!
//! Tokens are base64(nonce || ciphertext) under AES-256-GCM with a fresh
//! random nonce per call, so encrypting the same plaintext twice never
//! yields the same token and any tampering is detected on decrypt.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption key not configured")]
    KeyNotConfigured,

    #[error("invalid encryption key format")]
    InvalidKeyFormat,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid encrypted token format")]
    InvalidTokenFormat,
}

pub struct CryptoService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for CryptoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoService")
            .field("cipher", &"<redacted>")
            .finish()
    }
}

impl CryptoService {
    /// Build the vault from a base64-encoded 32-byte key
    pub fn from_key(key_str: &str) -> Result<Self, CryptoError> {
        let key_bytes = BASE64
            .decode(key_str.as_bytes())
            .map_err(|_| CryptoError::InvalidKeyFormat)?;

        if key_bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyFormat);
        }

        let key = aes_gcm::Key::<Aes256Gcm>::from_slice(&key_bytes);
        let cipher = Aes256Gcm::new(key);

        Ok(Self { cipher })
    }

    /// Generate a new random encryption key (base64-encoded)
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    /// Encrypt a plaintext string into a base64 token carrying its nonce
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        // 12-byte nonce per GCM call, never reused
        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt)
    ///
    /// Fails for tokens produced under a different key, truncated tokens,
    /// or any bit-flip in the ciphertext. The error carries no key material.
    pub fn decrypt(&self, token: &str) -> Result<String, CryptoError> {
        let combined = BASE64
            .decode(token.as_bytes())
            .map_err(|_| CryptoError::InvalidTokenFormat)?;

        if combined.len() < 12 {
            return Err(CryptoError::InvalidTokenFormat);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext_bytes).map_err(|_| CryptoError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key() {
        let key = CryptoService::generate_key();
        assert!(!key.is_empty());

        // Should be able to create the vault from a generated key
        let vault = CryptoService::from_key(&key);
        assert!(vault.is_ok());
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = CryptoService::generate_key();
        let vault = CryptoService::from_key(&key).unwrap();

        let plaintext = "xxxx yyyy zzzz wordpress-app-pass";
        let token = vault.encrypt(plaintext).unwrap();

        assert_ne!(token, plaintext);
        assert_eq!(vault.decrypt(&token).unwrap(), plaintext);
    }

    #[test]
    fn test_encrypt_is_not_deterministic() {
        let key = CryptoService::generate_key();
        let vault = CryptoService::from_key(&key).unwrap();

        let plaintext = "same-password";
        let token1 = vault.encrypt(plaintext).unwrap();
        let token2 = vault.encrypt(plaintext).unwrap();

        // Same plaintext must not be detectable by token comparison
        assert_ne!(token1, token2);

        assert_eq!(vault.decrypt(&token1).unwrap(), plaintext);
        assert_eq!(vault.decrypt(&token2).unwrap(), plaintext);
    }

    #[test]
    fn test_invalid_key_format() {
        assert!(CryptoService::from_key("not base64!!!").is_err());
        // Valid base64 but wrong length
        let short = BASE64.encode([0u8; 16]);
        assert!(CryptoService::from_key(&short).is_err());
    }

    #[test]
    fn test_decrypt_corrupted_token() {
        let key = CryptoService::generate_key();
        let vault = CryptoService::from_key(&key).unwrap();

        assert!(vault.decrypt("garbage-token").is_err());

        // Flip a ciphertext byte: GCM must reject it
        let token = vault.encrypt("secret").unwrap();
        let mut raw = BASE64.decode(token.as_bytes()).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = BASE64.encode(raw);
        assert!(vault.decrypt(&tampered).is_err());
    }

    #[test]
    fn test_decrypt_under_different_key() {
        let vault_a = CryptoService::from_key(&CryptoService::generate_key()).unwrap();
        let vault_b = CryptoService::from_key(&CryptoService::generate_key()).unwrap();

        let token = vault_a.encrypt("secret").unwrap();
        assert!(vault_b.decrypt(&token).is_err());
    }
}
