//! Passphrase-wrapped AES-256-GCM keys and authenticated JSON envelopes.
//!
//! # Flow
//!
//! 1. [`generate_encryption_decryption_key`] creates a [`DataKey`].
//! 2. [`generate_iv`] creates a passphrase IV; the caller persists it.
//! 3. [`wrap_key`] seals the data key under a key derived from a passphrase
//!    and that IV. The result is a base64 string safe to store.
//! 4. Later, [`unwrap_key`] with the same passphrase and passphrase IV
//!    recovers the data key.
//! 5. [`encrypt`] / [`decrypt`] protect any JSON-serialisable value.
//!
//! ```no_run
//! use serde_json::json;
//!
//! let key = envelope::generate_encryption_decryption_key()?;
//! let passphrase_iv = envelope::generate_iv()?;
//! let stored = envelope::wrap_key("123456", &passphrase_iv, &key)?;
//!
//! let key = envelope::unwrap_key("123456", &passphrase_iv, &stored)?;
//! let sealed = envelope::encrypt(&json!({"api_token": "abc"}), &key)?;
//! let opened: serde_json::Value = envelope::decrypt(&sealed, &key)?;
//! assert_eq!(opened["api_token"], "abc");
//! # Ok::<(), envelope::EnvelopeError>(())
//! ```
//!
//! # Envelope format
//!
//! Wrapped keys and encrypted data are both `base64(iv[12] || ciphertext || tag[16])`;
//! see [`common::protocol`].
//!
//! # Security invariants
//!
//! - A fresh random IV is drawn for every wrap and every encrypt.
//! - Authentication failures surface as [`EnvelopeError::Authentication`] and
//!   are never retried or masked.
//! - The library never persists key material; passphrases, plaintext and key
//!   bytes are never logged.

pub mod api;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod keys;
pub mod telemetry;
pub mod text;

pub use api::{
    decrypt, encrypt, generate_encryption_decryption_key, generate_iv, unwrap_key, wrap_key,
    EnvelopeCrypto,
};
pub use common::{Envelope, EnvelopeError, Result};
pub use config::Settings;
pub use engine::{CryptoEngine, EngineError, SoftwareEngine};
pub use keys::{DataKey, KeyId, KeyMaterial, KeyUsage, WrappingKey};
pub use text::TextEncoding;
