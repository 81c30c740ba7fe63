//! Public envelope operations.
//!
//! [`EnvelopeCrypto`] binds a [`CryptoEngine`] to [`Settings`] and exposes
//! the six operations. The free functions at the bottom of this module run the
//! same operations on a default `EnvelopeCrypto<SoftwareEngine>`.
//!
//! Every call is a pure function of its arguments plus one draw from the
//! engine's randomness source. Nothing is cached between calls, so a single
//! instance can be shared across threads.

use common::protocol::encode_iv;
use common::{Envelope, EnvelopeError, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::kdf::generate_wrapping_key;
use crate::crypto::random::fresh_iv;
use crate::engine::{CryptoEngine, EngineError, SoftwareEngine};
use crate::keys::DataKey;

/// Envelope operations over an injected crypto engine.
#[derive(Debug, Clone)]
pub struct EnvelopeCrypto<E = SoftwareEngine> {
    engine: E,
    settings: Settings,
}

impl EnvelopeCrypto<SoftwareEngine> {
    /// Software engine with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Software engine with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_engine(SoftwareEngine, settings)
    }

    /// Software engine with settings read from `ENVELOPE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded or are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::with_settings(Settings::from_env()?))
    }
}

impl Default for EnvelopeCrypto<SoftwareEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CryptoEngine> EnvelopeCrypto<E> {
    /// Use `engine` for every primitive.
    pub fn with_engine(engine: E, settings: Settings) -> Self {
        Self { engine, settings }
    }

    /// The active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate a random 12-byte IV, base64-encoded.
    ///
    /// Use it as a passphrase IV: persist it next to the wrapped key and pass
    /// it to both [`wrap_key`](Self::wrap_key) and
    /// [`unwrap_key`](Self::unwrap_key).
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::CryptoUnavailable`] if secure randomness is
    /// unavailable.
    pub fn generate_iv(&self) -> Result<String> {
        let iv = fresh_iv(&self.engine)?;
        Ok(encode_iv(&iv))
    }

    /// Generate a new encrypt/decrypt-only AES-256-GCM key.
    ///
    /// Wrap it with [`wrap_key`](Self::wrap_key) before storing it anywhere.
    pub fn generate_encryption_decryption_key(&self) -> Result<DataKey> {
        let key = DataKey::from_material(self.engine.generate_key()?);
        debug!(key_id = %key.id(), "data key generated");
        Ok(key)
    }

    /// Wrap `key` under a key derived from `passphrase` and `passphrase_iv`.
    ///
    /// Returns the base64 envelope `iv || wrapped key || tag`. The IV inside
    /// the envelope is freshly drawn and independent of `passphrase_iv`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Format`] if `passphrase_iv` does not decode to
    /// 12 bytes, or an engine error.
    pub fn wrap_key(&self, passphrase: &str, passphrase_iv: &str, key: &DataKey) -> Result<String> {
        let wrapping_key =
            generate_wrapping_key(&self.engine, passphrase, passphrase_iv, &self.settings)?;
        let iv = fresh_iv(&self.engine)?;
        let wrapped = wrapping_key.wrap(&self.engine, &iv, key)?;

        let packed = Envelope::new(iv, wrapped).pack();
        debug!(key_id = %key.id(), envelope_len = packed.len(), "data key wrapped");
        Ok(packed)
    }

    /// Recover a key wrapped by [`wrap_key`](Self::wrap_key).
    ///
    /// `passphrase` and `passphrase_iv` must be the values used at wrap time.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Authentication`] for a wrong passphrase, a
    /// wrong passphrase IV (when bound), or a tampered envelope, and
    /// [`EnvelopeError::Format`] for malformed input.
    pub fn unwrap_key(&self, passphrase: &str, passphrase_iv: &str, wrapped: &str) -> Result<DataKey> {
        let wrapping_key =
            generate_wrapping_key(&self.engine, passphrase, passphrase_iv, &self.settings)?;
        let envelope = Envelope::unpack(wrapped)?;
        let key = wrapping_key
            .unwrap(&self.engine, &envelope.iv, &envelope.payload)
            .map_err(|e| reject(e, "unwrap_key"))?;

        debug!(key_id = %key.id(), "data key unwrapped");
        Ok(key)
    }

    /// Serialise `value` to JSON and encrypt it under `key`.
    ///
    /// Returns the base64 envelope `iv || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Parse`] if `value` cannot be serialised to
    /// JSON, or an engine error.
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T, key: &DataKey) -> Result<String> {
        let json = Zeroizing::new(serde_json::to_string(value).map_err(|e| {
            EnvelopeError::Parse(format!("value is not JSON-serialisable: {e}"))
        })?);
        let plaintext = Zeroizing::new(self.settings.text_encoding.encode(&json));
        let iv = fresh_iv(&self.engine)?;
        let ciphertext = key.seal(&self.engine, &iv, &plaintext)?;

        let packed = Envelope::new(iv, ciphertext).pack();
        debug!(key_id = %key.id(), envelope_len = packed.len(), "payload encrypted");
        Ok(packed)
    }

    /// Decrypt an envelope produced by [`encrypt`](Self::encrypt) and parse
    /// the JSON inside.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Format`] for a malformed envelope,
    /// [`EnvelopeError::Authentication`] if the tag does not verify, and
    /// [`EnvelopeError::Parse`] if the plaintext is not valid JSON for `T`.
    pub fn decrypt<T: DeserializeOwned>(&self, envelope: &str, key: &DataKey) -> Result<T> {
        let envelope = Envelope::unpack(envelope)?;
        let plaintext = Zeroizing::new(
            key.open(&self.engine, &envelope.iv, &envelope.payload)
                .map_err(|e| reject(e, "decrypt"))?,
        );
        let json = Zeroizing::new(self.settings.text_encoding.decode(&plaintext)?);
        let value = serde_json::from_str(&json)
            .map_err(|e| EnvelopeError::Parse(format!("decrypted data is not valid JSON: {e}")))?;

        debug!(key_id = %key.id(), "payload decrypted");
        Ok(value)
    }
}

fn reject(e: EngineError, operation: &'static str) -> EnvelopeError {
    let err = EnvelopeError::from(e);
    if err.is_authentication() {
        warn!(operation, "envelope failed authentication");
    }
    err
}

// ---------------------------------------------------------------------------
// Default-engine shorthands
// ---------------------------------------------------------------------------

/// [`EnvelopeCrypto::generate_iv`] with the software engine and default settings.
pub fn generate_iv() -> Result<String> {
    EnvelopeCrypto::new().generate_iv()
}

/// [`EnvelopeCrypto::generate_encryption_decryption_key`] with the software engine.
pub fn generate_encryption_decryption_key() -> Result<DataKey> {
    EnvelopeCrypto::new().generate_encryption_decryption_key()
}

/// [`EnvelopeCrypto::wrap_key`] with the software engine and default settings.
pub fn wrap_key(passphrase: &str, passphrase_iv: &str, key: &DataKey) -> Result<String> {
    EnvelopeCrypto::new().wrap_key(passphrase, passphrase_iv, key)
}

/// [`EnvelopeCrypto::unwrap_key`] with the software engine and default settings.
pub fn unwrap_key(passphrase: &str, passphrase_iv: &str, wrapped: &str) -> Result<DataKey> {
    EnvelopeCrypto::new().unwrap_key(passphrase, passphrase_iv, wrapped)
}

/// [`EnvelopeCrypto::encrypt`] with the software engine and default settings.
pub fn encrypt<T: Serialize + ?Sized>(value: &T, key: &DataKey) -> Result<String> {
    EnvelopeCrypto::new().encrypt(value, key)
}

/// [`EnvelopeCrypto::decrypt`] with the software engine and default settings.
pub fn decrypt<T: DeserializeOwned>(envelope: &str, key: &DataKey) -> Result<T> {
    EnvelopeCrypto::new().decrypt(envelope, key)
}
