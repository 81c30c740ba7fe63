//! AES-256-GCM primitives, passphrase key derivation, and IV generation.
//!
//! Nothing here touches JSON or configuration loading.
//! It provides the low-level operations the public API orchestrates.
//!
//! # Fixed parameters
//!
//! | Parameter | Value       |
//! |-----------|-------------|
//! | Cipher    | AES-256-GCM |
//! | Digest    | SHA-256     |
//! | IV        | 12 bytes    |
//! | Key       | 256 bits    |
//!
//! None of these are configurable.

pub mod cipher;
pub mod kdf;
pub mod random;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;
