//! Capability-restricted AES-256-GCM key handles.
//!
//! There are two kinds of key and they are separate types:
//!
//! - [`DataKey`] encrypts and decrypts payloads. Callers create one with
//!   `generate_encryption_decryption_key`, wrap it for storage, and unwrap it
//!   before reuse.
//! - [`WrappingKey`] wraps and unwraps a [`DataKey`]. It is derived from a
//!   passphrase inside a single call and dropped at the end of it.
//!
//! Neither type exposes the other's operations, so a wrapping key cannot be
//! handed to `encrypt` and a data key cannot wrap another key.
//!
//! # Security invariants
//!
//! - Key bytes are zeroed on drop and never appear in `Debug` output.
//! - Raw [`DataKey`] bytes only leave the handle as the plaintext of a wrap.

use std::fmt;

use common::IV_LEN;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::KEY_LEN;
use crate::engine::{CryptoEngine, EngineError};

/// Raw 256-bit key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial([u8; KEY_LEN]);

impl KeyMaterial {
    /// Take ownership of raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy key bytes out of a slice.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidKeyLength`] unless `raw` is exactly
    /// [`KEY_LEN`] bytes.
    pub fn from_slice(raw: &[u8]) -> Result<Self, EngineError> {
        if raw.len() != KEY_LEN {
            return Err(EngineError::InvalidKeyLength(raw.len()));
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(raw);
        Ok(Self(bytes))
    }

    /// Borrow the key bytes. Intended for [`CryptoEngine`] implementations.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// An operation a key handle permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
}

/// Non-secret identifier attached to every [`DataKey`] for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId(Uuid);

impl KeyId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An encrypt/decrypt-only key.
#[derive(Clone)]
pub struct DataKey {
    id: KeyId,
    material: KeyMaterial,
}

impl DataKey {
    const USAGES: &'static [KeyUsage] = &[KeyUsage::Encrypt, KeyUsage::Decrypt];

    pub(crate) fn from_material(material: KeyMaterial) -> Self {
        Self {
            id: KeyId::new(),
            material,
        }
    }

    /// Identifier for logs. A key recovered by unwrapping gets a new id.
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Operations this key permits.
    pub fn usages(&self) -> &'static [KeyUsage] {
        Self::USAGES
    }

    pub(crate) fn seal<E: CryptoEngine + ?Sized>(
        &self,
        engine: &E,
        iv: &[u8; IV_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        engine.seal(&self.material, iv, &[], plaintext)
    }

    pub(crate) fn open<E: CryptoEngine + ?Sized>(
        &self,
        engine: &E,
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        engine.open(&self.material, iv, &[], ciphertext)
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("id", &self.id)
            .field("material", &"[REDACTED]")
            .finish()
    }
}

/// A wrap/unwrap-only key derived from a passphrase.
///
/// When `bind_passphrase_iv` is set, the passphrase IV is authenticated as
/// AES-GCM associated data on every wrap and unwrap, so unwrapping with a
/// different passphrase IV fails tag verification.
pub struct WrappingKey {
    material: KeyMaterial,
    passphrase_iv: [u8; IV_LEN],
    bind_passphrase_iv: bool,
}

impl WrappingKey {
    const USAGES: &'static [KeyUsage] = &[KeyUsage::WrapKey, KeyUsage::UnwrapKey];

    pub(crate) fn new(
        material: KeyMaterial,
        passphrase_iv: [u8; IV_LEN],
        bind_passphrase_iv: bool,
    ) -> Self {
        Self {
            material,
            passphrase_iv,
            bind_passphrase_iv,
        }
    }

    /// Operations this key permits.
    pub fn usages(&self) -> &'static [KeyUsage] {
        Self::USAGES
    }

    /// The passphrase IV this key was derived with.
    pub fn passphrase_iv(&self) -> &[u8; IV_LEN] {
        &self.passphrase_iv
    }

    fn aad(&self) -> &[u8] {
        if self.bind_passphrase_iv {
            &self.passphrase_iv
        } else {
            &[]
        }
    }

    /// Seal the raw bytes of `key` under this wrapping key and `iv`.
    pub(crate) fn wrap<E: CryptoEngine + ?Sized>(
        &self,
        engine: &E,
        iv: &[u8; IV_LEN],
        key: &DataKey,
    ) -> Result<Vec<u8>, EngineError> {
        engine.seal(&self.material, iv, self.aad(), key.material.as_bytes())
    }

    /// Open a wrapped key and re-import it as a fresh [`DataKey`].
    pub(crate) fn unwrap<E: CryptoEngine + ?Sized>(
        &self,
        engine: &E,
        iv: &[u8; IV_LEN],
        wrapped: &[u8],
    ) -> Result<DataKey, EngineError> {
        let raw = Zeroizing::new(engine.open(&self.material, iv, self.aad(), wrapped)?);
        let material = engine.import_key(&raw)?;
        Ok(DataKey::from_material(material))
    }
}

impl fmt::Debug for WrappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappingKey")
            .field("material", &"[REDACTED]")
            .field("bind_passphrase_iv", &self.bind_passphrase_iv)
            .finish()
    }
}
