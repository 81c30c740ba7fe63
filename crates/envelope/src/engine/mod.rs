//! The crypto engine capability.
//!
//! Every primitive the envelope operations need (randomness, digest, key
//! generation and import, AEAD seal and open) goes through [`CryptoEngine`].
//! [`SoftwareEngine`] is the RustCrypto-backed implementation; tests swap in
//! a mock to drive failure paths.
//!
//! Key wrapping is a seal of the raw key bytes under a
//! [`WrappingKey`](crate::keys::WrappingKey), and unwrapping is the matching
//! open followed by [`CryptoEngine::import_key`]. Both live on the key types
//! so the usage restriction is enforced by the type that holds the material.

pub mod software;

pub use software::SoftwareEngine;

use common::{EnvelopeError, IV_LEN};
use thiserror::Error;

use crate::crypto::cipher::CipherError;
use crate::crypto::{DIGEST_LEN, KEY_LEN};
use crate::keys::KeyMaterial;

/// Errors produced at the engine seam.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A facility the engine depends on (e.g. the OS CSPRNG) is missing.
    #[error("{0}")]
    Unavailable(String),

    /// Raw key material has the wrong length.
    #[error("invalid key material length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The AEAD primitive failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

impl From<EngineError> for EnvelopeError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Unavailable(msg) => EnvelopeError::CryptoUnavailable(msg),
            EngineError::Cipher(CipherError::Authentication) => EnvelopeError::Authentication,
            other => EnvelopeError::Crypto(other.to_string()),
        }
    }
}

/// Cryptographic primitives consumed by the envelope operations.
///
/// Implementations must be stateless between calls (or internally
/// synchronised) so one engine can serve concurrent callers.
#[cfg_attr(test, mockall::automock)]
pub trait CryptoEngine: Send + Sync {
    /// `len` cryptographically secure random bytes.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, EngineError>;

    /// SHA-256 of `data`.
    fn digest(&self, data: &[u8]) -> Result<[u8; DIGEST_LEN], EngineError>;

    /// Generate a new random 256-bit key.
    fn generate_key(&self) -> Result<KeyMaterial, EngineError>;

    /// Import raw bytes as 256-bit key material.
    fn import_key(&self, raw: &[u8]) -> Result<KeyMaterial, EngineError>;

    /// AES-256-GCM encrypt; returns ciphertext with the tag appended.
    fn seal(
        &self,
        key: &KeyMaterial,
        iv: &[u8; IV_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EngineError>;

    /// AES-256-GCM verify and decrypt.
    fn open(
        &self,
        key: &KeyMaterial,
        iv: &[u8; IV_LEN],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, EngineError>;
}
