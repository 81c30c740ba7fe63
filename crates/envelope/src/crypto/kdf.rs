//! Passphrase to [`WrappingKey`] derivation.
//!
//! The key material is `SHA-256(passphrase bytes)`. The passphrase IV is
//! scoped to the key (see [`WrappingKey`]), so callers must persist it and
//! pass the same value at wrap and unwrap time.

use common::{protocol::decode_iv, EnvelopeError};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::engine::CryptoEngine;
use crate::keys::WrappingKey;

/// Derive the wrapping key for `passphrase` and `passphrase_iv_b64`.
///
/// # Errors
///
/// Returns [`EnvelopeError::Format`] unless `passphrase_iv_b64` decodes to
/// exactly 12 bytes. Engine failures are propagated.
pub fn generate_wrapping_key<E: CryptoEngine + ?Sized>(
    engine: &E,
    passphrase: &str,
    passphrase_iv_b64: &str,
    settings: &Settings,
) -> Result<WrappingKey, EnvelopeError> {
    let passphrase_iv = decode_iv(passphrase_iv_b64)?;
    let passphrase_bytes = Zeroizing::new(settings.text_encoding.encode(passphrase));
    let digest = Zeroizing::new(engine.digest(&passphrase_bytes)?);
    let material = engine.import_key(digest.as_slice())?;
    Ok(WrappingKey::new(
        material,
        passphrase_iv,
        settings.bind_passphrase_iv,
    ))
}
