//! Identity-number field encryption and display masking.
//!
//! This module is intentionally free of HTTP and storage dependencies.
//! Record-management code calls into it through two operations only:
//! [`FieldCipher::encrypt`] before storage and [`FieldCipher::decrypt`]
//! followed by [`mask_identity_number`] after retrieval.
//!
//! # Ciphertext format
//!
//! ```text
//! <hex(iv, 16 bytes)>:<hex(aes-256-cbc ciphertext, PKCS#7 padded)>
//! ```
//!
//! The envelope carries no version or key id, so one key must serve every
//! stored envelope for its whole lifetime.

pub mod cipher;
pub mod key;
pub mod mask;

pub use cipher::FieldCipher;
pub use key::EncryptionSecret;
pub use mask::mask_identity_number;
