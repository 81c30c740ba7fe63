//! Envelope wire format, fixed algorithm constants, and errors shared across the envelope crates.

pub mod error;
pub mod protocol;

pub use error::{EnvelopeError, Result};
pub use protocol::{Envelope, IV_LEN, MIN_ENVELOPE_LEN, TAG_LEN};
