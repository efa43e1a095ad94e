//! Pass sealing with AES-256-GCM.
//!
//! A sealed pass is `base64url(nonce || ciphertext)`, a single opaque
//! string suitable for a 2-D barcode. Decoding fails closed: every failure
//! mode collapses to one error kind so nothing about the cause is
//! observable to the holder of a bad pass.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use rand::{rngs::OsRng, RngCore};

use eg_shared::config::pass_key::{PassKeyConfig, PASS_KEY_LEN};

use crate::domain::entities::pass::ClearancePayload;
use crate::errors::{ClearanceError, ClearanceResult, CodecError};

/// AES-GCM nonce length in bytes
const NONCE_LEN: usize = 12;

/// Trait defining pass sealing operations
pub trait PassCodec: Send + Sync {
    /// Seal a payload into an opaque pass string
    fn seal(&self, payload: &ClearancePayload) -> ClearanceResult<String>;

    /// Open a pass string back into its payload
    ///
    /// Any corruption, tampering, wrong key, or malformed plaintext yields
    /// `CodecError::InvalidSignature`, never a partially parsed payload.
    fn open(&self, sealed: &str) -> Result<ClearancePayload, CodecError>;
}

/// AES-256-GCM based pass codec
pub struct AesGcmPassCodec {
    cipher: Aes256Gcm,
}

impl AesGcmPassCodec {
    /// Create a codec from raw key bytes
    pub fn new(key: &[u8]) -> ClearanceResult<Self> {
        if key.len() != PASS_KEY_LEN {
            return Err(ClearanceError::crypto(format!(
                "pass key must be {} bytes, got {}",
                PASS_KEY_LEN,
                key.len()
            )));
        }
        let key = Key::<Aes256Gcm>::from_slice(key);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Create a codec from configuration
    pub fn from_config(config: &PassKeyConfig) -> ClearanceResult<Self> {
        let key = config
            .decode()
            .map_err(|e| ClearanceError::crypto(e.to_string()))?;
        Self::new(&key)
    }

    fn generate_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}

impl PassCodec for AesGcmPassCodec {
    fn seal(&self, payload: &ClearancePayload) -> ClearanceResult<String> {
        let plaintext = serde_json::to_vec(payload)
            .map_err(|e| ClearanceError::crypto(format!("payload serialization failed: {}", e)))?;

        let nonce = Self::generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|e| ClearanceError::crypto(format!("encryption failed: {}", e)))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64URL.encode(sealed))
    }

    fn open(&self, sealed: &str) -> Result<ClearancePayload, CodecError> {
        let raw = BASE64URL
            .decode(sealed.trim())
            .map_err(|_| CodecError::InvalidSignature)?;
        if raw.len() <= NONCE_LEN {
            return Err(CodecError::InvalidSignature);
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::InvalidSignature)?;

        serde_json::from_slice(&plaintext).map_err(|_| CodecError::InvalidSignature)
    }
}
