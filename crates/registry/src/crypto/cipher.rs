//! AES-256-CBC encryption and decryption of individual string fields.
//!
//! **Algorithm choice:** AES-256-CBC with PKCS#7 padding and a random 128-bit
//! IV per call. Identical plaintexts produce different envelopes, so an
//! envelope can never serve as a lookup key or be compared across records.
//!
//! **There is no integrity tag.** A wrong key or a tampered ciphertext is only
//! detected when PKCS#7 unpadding or UTF-8 decoding happens to fail; that is a
//! best-effort check, not authentication.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use aes::Aes256;
use cbc::cipher::{
    block_padding::Pkcs7, generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut,
    KeyIvInit,
};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tracing::warn;

use super::key::{derive_key, EncryptionSecret, KeyError, KeyMaterial};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Byte length of the CBC initialisation vector (16 bytes = one AES block).
pub const IV_LEN: usize = 16;

/// Separator between the IV and ciphertext halves of an envelope.
pub const SEPARATOR: char = ':';

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The envelope is missing its separator or one of its halves.
    #[error("invalid envelope format")]
    MalformedEnvelope,

    /// One of the envelope halves is not valid hexadecimal.
    #[error("envelope is not valid hex")]
    InvalidHex,

    /// The IV half does not decode to [`IV_LEN`] bytes.
    #[error("invalid IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),

    /// CBC decryption or PKCS#7 unpadding failed (wrong key, corrupted or
    /// tampered ciphertext).
    #[error("decryption failed")]
    DecryptionFailure,

    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

/// A parsed, encrypted field value.
///
/// The string representation is `<hex(iv)>:<hex(ciphertext)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw PKCS#7-padded ciphertext bytes.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Parse an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if the separator or either
    /// half is missing, [`CipherError::InvalidHex`] if a half is not hex, and
    /// [`CipherError::InvalidIvLength`] if the IV is not [`IV_LEN`] bytes.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        let (iv_hex, ct_hex) = s
            .split_once(SEPARATOR)
            .ok_or(CipherError::MalformedEnvelope)?;
        if iv_hex.is_empty() || ct_hex.is_empty() {
            return Err(CipherError::MalformedEnvelope);
        }

        let iv_bytes = hex::decode(iv_hex).map_err(|_| CipherError::InvalidHex)?;
        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::InvalidHex)?;

        let iv: [u8; IV_LEN] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CipherError::InvalidIvLength(iv_bytes.len()))?;

        Ok(Self { iv, ciphertext })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            hex::encode(self.iv),
            SEPARATOR,
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for Envelope {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Encrypt a plaintext string with AES-256-CBC under a fresh random IV.
///
/// The plaintext is encrypted verbatim; formatting characters are kept.
pub fn encrypt_field(plaintext: &str, key: &KeyMaterial) -> Envelope {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, key, iv)
}

fn encrypt_with_iv(plaintext: &str, key: &KeyMaterial, iv: [u8; IV_LEN]) -> Envelope {
    let ciphertext = Aes256CbcEnc::new(
        GenericArray::from_slice(key.as_bytes()),
        GenericArray::from_slice(&iv),
    )
    .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    Envelope { iv, ciphertext }
}

/// Decrypt an [`Envelope`] back to its plaintext string.
///
/// # Errors
///
/// Returns [`CipherError::DecryptionFailure`] if unpadding fails and
/// [`CipherError::InvalidUtf8`] if the recovered bytes are not UTF-8.
pub fn decrypt_field(envelope: &Envelope, key: &KeyMaterial) -> Result<String, CipherError> {
    let plaintext = Aes256CbcDec::new(
        GenericArray::from_slice(key.as_bytes()),
        GenericArray::from_slice(&envelope.iv),
    )
    .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
    .map_err(|_| CipherError::DecryptionFailure)?;
    String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
}

/// Field encryption engine bound to the process-wide key material.
///
/// Built once at startup from configuration and shared by every request
/// handler. Cloning is cheap; the key lives behind an `Arc`.
#[derive(Clone, Debug)]
pub struct FieldCipher {
    key: Arc<KeyMaterial>,
}

impl FieldCipher {
    /// Derive the key material from `secret` and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::MissingSecret`] if the secret is empty.
    pub fn new(secret: &EncryptionSecret) -> Result<Self, KeyError> {
        let key = derive_key(secret.expose())?;
        Ok(Self { key: Arc::new(key) })
    }

    /// Protect a value before storage.
    ///
    /// Returns `None` for an absent or empty input without touching the key
    /// or the random number generator.
    pub fn encrypt(&self, plaintext: Option<&str>) -> Option<String> {
        let plaintext = plaintext.filter(|p| !p.is_empty())?;
        Some(encrypt_field(plaintext, &self.key).to_string())
    }

    /// Decrypt an envelope string, keeping the failure reason.
    ///
    /// # Errors
    ///
    /// Any [`CipherError`] from parsing or decryption.
    pub fn try_decrypt(&self, envelope: &str) -> Result<String, CipherError> {
        let envelope = Envelope::parse(envelope)?;
        decrypt_field(&envelope, &self.key)
    }

    /// Recover a displayable value after retrieval.
    ///
    /// Never fails: an absent input and every decryption failure both yield
    /// `None`. Failures are logged with their reason only.
    pub fn decrypt(&self, envelope: Option<&str>) -> Option<String> {
        let envelope = envelope.filter(|e| !e.is_empty())?;
        match self.try_decrypt(envelope) {
            Ok(plaintext) => Some(plaintext),
            Err(e) => {
                warn!(error = %e, "field decryption failed");
                None
            }
        }
    }
}
