//! AES-256-GCM encryption of installation tokens at rest.
//!
//! The stored form is a JSON envelope of hex strings: the nonce (`iv`), the
//! authentication tag (`tag`) and the ciphertext (`content`).

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption key must be 32 bytes of hex: {0}")]
    InvalidKey(String),

    #[error("malformed encrypted token: {0}")]
    Malformed(String),

    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed")]
    Decrypt,
}

/// Encrypted token as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedToken {
    pub iv: String,
    pub tag: String,
    pub content: String,
}

impl EncryptedToken {
    pub fn to_json(&self) -> Result<String, CipherError> {
        serde_json::to_string(self).map_err(|e| CipherError::Malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CipherError> {
        serde_json::from_str(json).map_err(|e| CipherError::Malformed(e.to_string()))
    }
}

/// Symmetric cipher for installation tokens
#[derive(Clone)]
pub struct TokenCipher {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}

impl TokenCipher {
    /// Build a cipher from a 64 character hex key
    pub fn from_hex(key_hex: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(key_hex.trim()).map_err(|e| CipherError::InvalidKey(e.to_string()))?;
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| CipherError::InvalidKey(format!("got {} bytes", b.len())))?;
        Ok(Self { key })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedToken, CipherError> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| CipherError::InvalidKey(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        // aes-gcm appends the tag to the ciphertext
        let mut sealed = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(EncryptedToken {
            iv: hex::encode(nonce_bytes),
            tag: hex::encode(tag),
            content: hex::encode(sealed),
        })
    }

    pub fn decrypt(&self, token: &EncryptedToken) -> Result<String, CipherError> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| CipherError::InvalidKey(e.to_string()))?;

        let nonce = hex::decode(&token.iv).map_err(|e| CipherError::Malformed(e.to_string()))?;
        if nonce.len() != NONCE_LEN {
            return Err(CipherError::Malformed(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            )));
        }
        let tag = hex::decode(&token.tag).map_err(|e| CipherError::Malformed(e.to_string()))?;
        let mut sealed =
            hex::decode(&token.content).map_err(|e| CipherError::Malformed(e.to_string()))?;
        sealed.extend_from_slice(&tag);

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce), sealed.as_ref())
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|e| CipherError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_encrypt_then_decrypt() {
        let cipher = TokenCipher::from_hex(KEY).unwrap();
        let encrypted = cipher.encrypt("installation-token").unwrap();

        assert_eq!(encrypted.iv.len(), NONCE_LEN * 2);
        assert_eq!(encrypted.tag.len(), TAG_LEN * 2);
        assert_ne!(encrypted.content, hex::encode("installation-token"));

        let json = encrypted.to_json().unwrap();
        let parsed = EncryptedToken::from_json(&json).unwrap();
        assert_eq!(cipher.decrypt(&parsed).unwrap(), "installation-token");
    }

    #[test]
    fn test_nonce_is_random() {
        let cipher = TokenCipher::from_hex(KEY).unwrap();
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.content, b.content);
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let cipher = TokenCipher::from_hex(KEY).unwrap();
        let mut encrypted = cipher.encrypt("secret").unwrap();
        let mut tag = hex::decode(&encrypted.tag).unwrap();
        tag[0] ^= 0xff;
        encrypted.tag = hex::encode(tag);

        assert!(matches!(cipher.decrypt(&encrypted), Err(CipherError::Decrypt)));
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let encrypted = TokenCipher::from_hex(KEY).unwrap().encrypt("secret").unwrap();
        let other = TokenCipher::from_hex(&"ab".repeat(32)).unwrap();
        assert!(matches!(other.decrypt(&encrypted), Err(CipherError::Decrypt)));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(TokenCipher::from_hex(""), Err(CipherError::InvalidKey(_))));
        assert!(matches!(TokenCipher::from_hex("zz"), Err(CipherError::InvalidKey(_))));
        assert!(matches!(TokenCipher::from_hex(&"ab".repeat(16)), Err(CipherError::InvalidKey(_))));
    }
}
