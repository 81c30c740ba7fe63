//! Fresh IVs drawn from the engine's secure randomness source.

use common::{EnvelopeError, IV_LEN};

use crate::engine::CryptoEngine;

/// Draw a new random IV.
///
/// # Errors
///
/// Returns [`EnvelopeError::CryptoUnavailable`] if the engine cannot produce
/// secure random bytes, and [`EnvelopeError::Crypto`] if it returns the wrong
/// number of them.
pub fn fresh_iv<E: CryptoEngine + ?Sized>(engine: &E) -> Result<[u8; IV_LEN], EnvelopeError> {
    let bytes = engine.random_bytes(IV_LEN)?;
    <[u8; IV_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
        EnvelopeError::Crypto(format!(
            "engine returned {} random bytes, expected {IV_LEN}",
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, MockCryptoEngine, SoftwareEngine};

    #[test]
    fn successive_ivs_differ() {
        let engine = SoftwareEngine;
        assert_ne!(fresh_iv(&engine).unwrap(), fresh_iv(&engine).unwrap());
    }

    #[test]
    fn missing_randomness_is_reported_as_unavailable() {
        let mut engine = MockCryptoEngine::new();
        engine
            .expect_random_bytes()
            .returning(|_| Err(EngineError::Unavailable("no entropy source".into())));
        let err = fresh_iv(&engine).unwrap_err();
        assert!(matches!(err, EnvelopeError::CryptoUnavailable(ref m) if m.contains("entropy")));
    }

    #[test]
    fn short_draw_is_rejected() {
        let mut engine = MockCryptoEngine::new();
        engine.expect_random_bytes().returning(|_| Ok(vec![0u8; 4]));
        assert!(matches!(fresh_iv(&engine), Err(EnvelopeError::Crypto(_))));
    }
}
