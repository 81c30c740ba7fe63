//! AES-256-GCM sealing and opening of raw byte buffers.
//!
//! **Every call must use a fresh IV for a given key.** GCM nonce reuse is
//! catastrophic: it leaks the XOR of plaintexts and lets an attacker forge
//! tags. The callers in this crate draw a new random IV per operation.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use common::IV_LEN;
use thiserror::Error;

use super::KEY_LEN;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM refused to encrypt (unreachable with a valid key and a sane
    /// plaintext length).
    #[error("aead encryption failed")]
    Encryption,

    /// The authentication tag did not verify.
    #[error("aead authentication failed")]
    Authentication,
}

/// Encrypt `plaintext` under `key` and `iv`, authenticating `aad` alongside.
///
/// Returns the ciphertext with the 16-byte tag appended.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::Encryption`] on an internal AEAD error.
pub fn encrypt_raw(
    key: &[u8],
    iv: &[u8; IV_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    cipher
        .encrypt(
            Nonce::from_slice(iv),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CipherError::Encryption)
}

/// Verify and decrypt `ciphertext` (tag appended) under `key` and `iv`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::Authentication`] if the tag does not verify: wrong
/// key, wrong IV, wrong `aad`, or tampered data.
pub fn decrypt_raw(
    key: &[u8],
    iv: &[u8; IV_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    cipher
        .decrypt(
            Nonce::from_slice(iv),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| CipherError::Authentication)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TAG_LEN;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const IV: [u8; IV_LEN] = [0x24; IV_LEN];

    #[test]
    fn encrypt_decrypt_round_trip() {
        let ct = encrypt_raw(&KEY, &IV, b"", b"123-45-6789").unwrap();
        assert_eq!(decrypt_raw(&KEY, &IV, b"", &ct).unwrap(), b"123-45-6789");
    }

    #[test]
    fn tag_is_appended() {
        let ct = encrypt_raw(&KEY, &IV, b"", b"twelve bytes").unwrap();
        assert_eq!(ct.len(), 12 + TAG_LEN);
    }

    #[test]
    fn nist_empty_plaintext_vector() {
        // AES-256, all-zero key and IV, empty plaintext: only the tag is produced.
        let tag = encrypt_raw(&[0u8; KEY_LEN], &[0u8; IV_LEN], b"", b"").unwrap();
        assert_eq!(
            tag,
            [
                0x53, 0x0f, 0x8a, 0xfb, 0xc7, 0x45, 0x36, 0xb9, 0xa9, 0x63, 0xb4, 0xf1, 0xc4,
                0xcb, 0x73, 0x8b
            ]
        );
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let ct = encrypt_raw(&KEY, &IV, b"", b"secret").unwrap();
        let other = [0x43u8; KEY_LEN];
        assert_eq!(
            decrypt_raw(&other, &IV, b"", &ct),
            Err(CipherError::Authentication)
        );
    }

    #[test]
    fn wrong_iv_fails_authentication() {
        let ct = encrypt_raw(&KEY, &IV, b"", b"secret").unwrap();
        let other = [0x25u8; IV_LEN];
        assert_eq!(
            decrypt_raw(&KEY, &other, b"", &ct),
            Err(CipherError::Authentication)
        );
    }

    #[test]
    fn mismatched_aad_fails_authentication() {
        let ct = encrypt_raw(&KEY, &IV, b"bound", b"secret").unwrap();
        assert_eq!(
            decrypt_raw(&KEY, &IV, b"other", &ct),
            Err(CipherError::Authentication)
        );
        assert_eq!(decrypt_raw(&KEY, &IV, b"bound", &ct).unwrap(), b"secret");
    }

    #[test]
    fn invalid_key_length_rejected() {
        assert_eq!(
            encrypt_raw(&[0u8; 16], &IV, b"", b"x"),
            Err(CipherError::InvalidKeyLength)
        );
        assert_eq!(
            decrypt_raw(&[0u8; 16], &IV, b"", &[0u8; TAG_LEN]),
            Err(CipherError::InvalidKeyLength)
        );
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let mut ct = encrypt_raw(&KEY, &IV, b"", b"tamper me").unwrap();
        // Flip a byte of the tag.
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert_eq!(
            decrypt_raw(&KEY, &IV, b"", &ct),
            Err(CipherError::Authentication)
        );
    }
}
