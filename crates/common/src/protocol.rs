//! The envelope wire format.
//!
//! Wrapped keys and encrypted data share one layout:
//!
//! ```text
//! base64( iv[12] || ciphertext || tag[16] )
//! ```
//!
//! The base64 alphabet is the standard one, padded. Only the meaning of the
//! payload differs between the two uses.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EnvelopeError;

/// Byte length of an AES-GCM IV (96 bits).
pub const IV_LEN: usize = 12;

/// Byte length of the AES-GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Shortest decoded envelope that can be well formed: an IV plus an empty
/// ciphertext's tag.
pub const MIN_ENVELOPE_LEN: usize = IV_LEN + TAG_LEN;

/// A decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// IV the payload was sealed under.
    pub iv: [u8; IV_LEN],
    /// Ciphertext with the authentication tag at the end.
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Build an envelope from an IV and a sealed payload.
    pub fn new(iv: [u8; IV_LEN], payload: Vec<u8>) -> Self {
        Self { iv, payload }
    }

    /// Concatenate the IV and payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.payload.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Split raw envelope bytes into IV and payload.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Format`] if `bytes` is shorter than
    /// [`MIN_ENVELOPE_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(EnvelopeError::Format(format!(
                "envelope too short: expected at least {MIN_ENVELOPE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (iv_bytes, payload) = bytes.split_at(IV_LEN);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(iv_bytes);
        Ok(Self {
            iv,
            payload: payload.to_vec(),
        })
    }

    /// Encode this envelope to its base64 text form.
    pub fn pack(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode an envelope from its base64 text form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Format`] if `text` is not valid base64 or the
    /// decoded bytes are too short.
    pub fn unpack(text: &str) -> Result<Self, EnvelopeError> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| EnvelopeError::Format(format!("invalid base64 envelope: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pack())
    }
}

impl FromStr for Envelope {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::unpack(s)
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pack())
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::unpack(&text).map_err(de::Error::custom)
    }
}

/// Encode raw IV bytes to their base64 transport form.
pub fn encode_iv(iv: &[u8; IV_LEN]) -> String {
    STANDARD.encode(iv)
}

/// Decode a base64 IV.
///
/// # Errors
///
/// Returns [`EnvelopeError::Format`] if `text` is not valid base64 or does not
/// decode to exactly [`IV_LEN`] bytes.
pub fn decode_iv(text: &str) -> Result<[u8; IV_LEN], EnvelopeError> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| EnvelopeError::Format(format!("invalid base64 IV: {e}")))?;
    if bytes.len() != IV_LEN {
        return Err(EnvelopeError::Format(format!(
            "invalid IV length: expected {IV_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&bytes);
    Ok(iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope::new([7u8; IV_LEN], vec![0xAB; TAG_LEN + 5])
    }

    #[test]
    fn pack_unpack_round_trip() {
        let env = sample();
        let text = env.pack();
        // 12 + 21 = 33 bytes → 44 base64 chars, padded.
        assert_eq!(text.len() % 4, 0);
        assert_eq!(Envelope::unpack(&text).unwrap(), env);
    }

    #[test]
    fn iv_is_the_leading_twelve_bytes() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..IV_LEN], &[7u8; IV_LEN]);
        assert_eq!(bytes.len(), IV_LEN + TAG_LEN + 5);
    }

    #[test]
    fn unpack_rejects_bad_base64() {
        let err = Envelope::unpack("!!!not base64!!!").unwrap_err();
        assert!(matches!(err, EnvelopeError::Format(_)));
    }

    #[test]
    fn unpack_rejects_truncated_envelope() {
        // IV present but no room for a tag.
        let short = STANDARD.encode([0u8; MIN_ENVELOPE_LEN - 1]);
        assert!(matches!(
            Envelope::unpack(&short),
            Err(EnvelopeError::Format(_))
        ));
        // Shorter than the IV itself.
        let tiny = STANDARD.encode([0u8; 4]);
        assert!(matches!(Envelope::unpack(&tiny), Err(EnvelopeError::Format(_))));
    }

    #[test]
    fn minimum_length_envelope_is_accepted() {
        let exact = STANDARD.encode([1u8; MIN_ENVELOPE_LEN]);
        let env = Envelope::unpack(&exact).unwrap();
        assert_eq!(env.payload.len(), TAG_LEN);
    }

    #[test]
    fn display_and_from_str_agree() {
        let env = sample();
        let parsed: Envelope = env.to_string().parse().unwrap();
        assert_eq!(parsed, env);
    }

    #[test]
    fn serde_uses_the_base64_string() {
        let env = sample();
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, format!("\"{}\"", env.pack()));
        let decoded: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn serde_rejects_malformed_string() {
        assert!(serde_json::from_str::<Envelope>("\"AAAA\"").is_err());
    }

    #[test]
    fn decode_iv_accepts_twelve_bytes() {
        let iv = [9u8; IV_LEN];
        let text = encode_iv(&iv);
        assert_eq!(text.len(), 16);
        assert_eq!(decode_iv(&text).unwrap(), iv);
    }

    #[test]
    fn decode_iv_rejects_wrong_length() {
        let sixteen = STANDARD.encode([0u8; 16]);
        assert!(matches!(decode_iv(&sixteen), Err(EnvelopeError::Format(_))));
        assert!(matches!(decode_iv(""), Err(EnvelopeError::Format(_))));
    }

    #[test]
    fn decode_iv_rejects_bad_base64() {
        assert!(matches!(decode_iv("@@@@"), Err(EnvelopeError::Format(_))));
    }
}
