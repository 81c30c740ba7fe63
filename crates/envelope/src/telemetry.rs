//! Optional tracing setup for applications embedding the envelope library.
//!
//! The library only emits `tracing` events; it never installs a subscriber on
//! its own. Hosts that have no subscriber can call [`init`] once at startup.
//!
//! # Telemetry invariants
//!
//! - **No passphrases, plaintext, or key material** appear in any event field.
//!   Keys are referred to by their [`KeyId`](crate::keys::KeyId) only.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise a global JSON tracing subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise envelope tracing subscriber: {e}"))
}
