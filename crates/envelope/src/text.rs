//! Text to byte conversion for passphrases and JSON payloads.

use common::EnvelopeError;
use serde::Deserialize;

/// How text becomes bytes before hashing or encryption, and back after
/// decryption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Full UTF-8.
    #[default]
    Utf8,
    /// One byte per UTF-16 code unit, truncated to its low 8 bits.
    ///
    /// Lossy above U+00FF. Only for reading envelopes written by the browser
    /// implementation, which converted text this way.
    Latin1,
}

impl TextEncoding {
    /// Convert `text` to bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Latin1 => text.encode_utf16().map(|unit| unit as u8).collect(),
        }
    }

    /// Convert decrypted bytes back to text.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Parse`] if `bytes` are not valid UTF-8 under
    /// [`TextEncoding::Utf8`]. Latin-1 decoding cannot fail.
    pub fn decode(self, bytes: &[u8]) -> Result<String, EnvelopeError> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| EnvelopeError::Parse(format!("decrypted data is not UTF-8: {e}"))),
            TextEncoding::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
        }
    }
}
