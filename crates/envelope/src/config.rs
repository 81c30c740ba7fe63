//! Settings loading and validation.
//!
//! Values are read from `ENVELOPE_`-prefixed environment variables. Every
//! field has a default, so an empty environment yields [`Settings::default`].
//! Algorithm parameters are constants and are not part of the settings.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::text::TextEncoding;

/// Prefix of the environment variables read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "ENVELOPE";

/// Validated envelope settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// How passphrases and JSON text become bytes (`utf8` or `latin1`).
    #[serde(default)]
    pub text_encoding: TextEncoding,

    /// Authenticate the passphrase IV as associated data when wrapping keys.
    #[serde(default = "default_bind_passphrase_iv")]
    pub bind_passphrase_iv: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_passphrase_iv() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_encoding: TextEncoding::default(),
            bind_passphrase_iv: default_bind_passphrase_iv(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Compatibility profile for envelopes written by the browser
    /// implementation: Latin-1 text conversion and an unbound passphrase IV.
    pub fn legacy() -> Self {
        Self {
            text_encoding: TextEncoding::Latin1,
            bind_passphrase_iv: false,
            ..Self::default()
        }
    }

    /// Load and validate settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a value is invalid.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("failed to build envelope settings from environment")?;
        Self::from_config(cfg)
    }

    fn from_config(cfg: config::Config) -> Result<Self> {
        let s: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise envelope settings")?;
        s.validate()?;
        Ok(s)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("ENVELOPE_LOG_LEVEL must not be empty");
        }
        tracing_subscriber::EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("ENVELOPE_LOG_LEVEL is not a valid filter: {}", self.log_level))?;
        Ok(())
    }
}
