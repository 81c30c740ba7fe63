//! Error type shared by every envelope operation.

use thiserror::Error;

/// Top-level envelope error type.
///
/// Variants map to stable machine-readable codes via [`EnvelopeError::code`]:
/// - [`EnvelopeError::Format`] → `format_error`
/// - [`EnvelopeError::Authentication`] → `authentication_error`
/// - [`EnvelopeError::Crypto`] → `crypto_error`
/// - [`EnvelopeError::CryptoUnavailable`] → `crypto_unavailable`
/// - [`EnvelopeError::Parse`] → `parse_error`
///
/// None of these are retried or recovered internally. An authentication
/// failure means a wrong key, a wrong IV, or tampered data.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Malformed base64, an IV of the wrong length, or a truncated envelope.
    #[error("format error: {0}")]
    Format(String),

    /// AES-GCM tag verification failed.
    #[error("authentication failed: wrong key, wrong IV, or tampered ciphertext")]
    Authentication,

    /// The cipher rejected the key or reached an invalid state.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The crypto engine (or its randomness source) is missing or misconfigured.
    #[error("crypto engine unavailable: {0}")]
    CryptoUnavailable(String),

    /// Decrypted bytes are not valid JSON text, or a value could not be serialised.
    #[error("parse error: {0}")]
    Parse(String),
}

impl EnvelopeError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EnvelopeError::Format(_) => "format_error",
            EnvelopeError::Authentication => "authentication_error",
            EnvelopeError::Crypto(_) => "crypto_error",
            EnvelopeError::CryptoUnavailable(_) => "crypto_unavailable",
            EnvelopeError::Parse(_) => "parse_error",
        }
    }

    /// Returns `true` if this error is a failed tag verification.
    pub fn is_authentication(&self) -> bool {
        matches!(self, EnvelopeError::Authentication)
    }
}

/// Result alias defaulting to [`EnvelopeError`].
pub type Result<T, E = EnvelopeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(EnvelopeError::Format("x".into()).code(), "format_error");
        assert_eq!(EnvelopeError::Authentication.code(), "authentication_error");
        assert_eq!(EnvelopeError::Crypto("x".into()).code(), "crypto_error");
        assert_eq!(
            EnvelopeError::CryptoUnavailable("x".into()).code(),
            "crypto_unavailable"
        );
        assert_eq!(EnvelopeError::Parse("x".into()).code(), "parse_error");
    }

    #[test]
    fn display_includes_message() {
        let e = EnvelopeError::Format("envelope too short".into());
        assert!(e.to_string().contains("envelope too short"));
    }

    #[test]
    fn only_authentication_is_authentication() {
        assert!(EnvelopeError::Authentication.is_authentication());
        assert!(!EnvelopeError::Crypto("bad key".into()).is_authentication());
    }
}
