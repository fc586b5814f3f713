//! Key material derivation from the configured encryption secret.
//!
//! The secret's UTF-8 bytes are right-padded with ASCII `'0'` or truncated to
//! exactly [`KEY_LEN`] bytes. This is **not** a KDF: it adds no strength to a
//! short or low-entropy secret. The rule is fixed because every stored
//! envelope was produced with it; swapping in a real KDF would make existing
//! records undecryptable.

use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroize;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte appended to short secrets.
const PAD_BYTE: u8 = b'0';

/// Errors produced while deriving key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The encryption secret is absent or empty. Fatal for any code path that
    /// encrypts or decrypts.
    #[error("encryption secret is missing or empty")]
    MissingSecret,
}

/// The raw encryption secret as supplied by process configuration.
///
/// Deserialises transparently from a string so it can sit directly inside
/// [`crate::config::Config`].
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EncryptionSecret(String);

impl EncryptionSecret {
    #[cfg(test)]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for EncryptionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionSecret([REDACTED])")
    }
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Zeroed on drop. Never serialised and never printed.
pub struct KeyMaterial(Box<[u8; KEY_LEN]>);

impl KeyMaterial {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Zeroize for KeyMaterial {
    fn zeroize(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// Derive the 32-byte key material from `secret`.
///
/// Deterministic: the same secret always yields the same key. Only the first
/// [`KEY_LEN`] bytes of the secret's UTF-8 encoding take part.
///
/// # Errors
///
/// Returns [`KeyError::MissingSecret`] if `secret` is empty.
pub fn derive_key(secret: &str) -> Result<KeyMaterial, KeyError> {
    if secret.is_empty() {
        return Err(KeyError::MissingSecret);
    }
    let mut buf = Box::new([PAD_BYTE; KEY_LEN]);
    let raw = secret.as_bytes();
    let n = raw.len().min(KEY_LEN);
    buf[..n].copy_from_slice(&raw[..n]);
    Ok(KeyMaterial(buf))
}
