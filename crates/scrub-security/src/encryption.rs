//! Reversible AES-256-GCM encryption for the `encrypt` operator

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;
use rand::rngs::OsRng;
use scrub_core::{Error, Result};

const KEY_CONTEXT: &str = "scrub 2024-06 entity encryption key";
const NONCE_LEN: usize = 12;

/// Encrypts entity text into base64 `nonce || ciphertext` strings
pub struct EntityCipher {
    cipher: Aes256Gcm,
}

impl EntityCipher {
    pub fn new(secret: &str) -> Result<Self> {
        let key = blake3::derive_key(KEY_CONTEXT, secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| Error::Redactor(format!("Invalid encryption key: {}", e)))?;
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::Redactor(format!("Encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let combined = STANDARD
            .decode(encoded)
            .map_err(|e| Error::Redactor(format!("Invalid ciphertext encoding: {}", e)))?;

        if combined.len() <= NONCE_LEN {
            return Err(Error::Redactor("Ciphertext too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| Error::Redactor(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| Error::Redactor(format!("Decrypted text is not UTF-8: {}", e)))
    }
}
