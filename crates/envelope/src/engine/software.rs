//! [`SoftwareEngine`]: RustCrypto AES-256-GCM and SHA-256 over the OS CSPRNG.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::IV_LEN;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{CryptoEngine, EngineError};
use crate::crypto::cipher::{decrypt_raw, encrypt_raw};
use crate::crypto::{DIGEST_LEN, KEY_LEN};
use crate::keys::KeyMaterial;

/// Pure-software crypto engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareEngine;

impl CryptoEngine for SoftwareEngine {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, EngineError> {
        let mut buf = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| EngineError::Unavailable(format!("secure randomness unavailable: {e}")))?;
        Ok(buf)
    }

    fn digest(&self, data: &[u8]) -> Result<[u8; DIGEST_LEN], EngineError> {
        let hash = Sha256::digest(data);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hash);
        Ok(out)
    }

    fn generate_key(&self) -> Result<KeyMaterial, EngineError> {
        let raw = Zeroizing::new(self.random_bytes(KEY_LEN)?);
        KeyMaterial::from_slice(&raw)
    }

    fn import_key(&self, raw: &[u8]) -> Result<KeyMaterial, EngineError> {
        KeyMaterial::from_slice(raw)
    }

    fn seal(
        &self,
        key: &KeyMaterial,
        iv: &[u8; IV_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        Ok(encrypt_raw(key.as_bytes(), iv, aad, plaintext)?)
    }

    fn open(
        &self,
        key: &KeyMaterial,
        iv: &[u8; IV_LEN],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        Ok(decrypt_raw(key.as_bytes(), iv, aad, ciphertext)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::CipherError;

    #[test]
    fn sha256_known_answer() {
        let digest = SoftwareEngine.digest(b"abc").unwrap();
        assert_eq!(
            digest,
            [
                186, 120, 22, 191, 143, 1, 207, 234, 65, 65, 64, 222, 93, 174, 34, 35, 176, 3,
                97, 163, 150, 23, 122, 156, 180, 16, 255, 97, 242, 0, 21, 173
            ]
        );
    }

    #[test]
    fn random_bytes_has_requested_length() {
        assert_eq!(SoftwareEngine.random_bytes(0).unwrap().len(), 0);
        assert_eq!(SoftwareEngine.random_bytes(IV_LEN).unwrap().len(), IV_LEN);
    }

    #[test]
    fn generated_keys_differ() {
        let a = SoftwareEngine.generate_key().unwrap();
        let b = SoftwareEngine.generate_key().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn import_rejects_wrong_length() {
        assert!(matches!(
            SoftwareEngine.import_key(&[0u8; 16]),
            Err(EngineError::InvalidKeyLength(16))
        ));
    }

    #[test]
    fn seal_open_round_trip() {
        let key = SoftwareEngine.generate_key().unwrap();
        let iv = [3u8; IV_LEN];
        let ct = SoftwareEngine.seal(&key, &iv, b"aad", b"payload").unwrap();
        let pt = SoftwareEngine.open(&key, &iv, b"aad", &ct).unwrap();
        assert_eq!(pt, b"payload");
    }

    #[test]
    fn open_with_other_key_is_an_authentication_failure() {
        let key = SoftwareEngine.generate_key().unwrap();
        let other = SoftwareEngine.generate_key().unwrap();
        let iv = [3u8; IV_LEN];
        let ct = SoftwareEngine.seal(&key, &iv, b"", b"payload").unwrap();
        assert!(matches!(
            SoftwareEngine.open(&other, &iv, b"", &ct),
            Err(EngineError::Cipher(CipherError::Authentication))
        ));
    }
}
