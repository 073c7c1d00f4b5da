//! Credential loading and validation.
//!
//! Values are read from environment variables by [`Credentials::from_env`], or
//! from any prepared [`config::Config`] by [`Credentials::from_config`].

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::key::ENCODED_KEY_LEN;

/// The credential set issued by the platform for one callback application.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// 43-character base64 encoding key (`ENCODING_AES_KEY`). **Required.**
    pub encoding_aes_key: String,

    /// Shared signing token (`SIGN_TOKEN`). **Required.**
    pub sign_token: String,

    /// App or corp identifier embedded in every envelope (`APP_ID`). **Required.**
    pub app_id: String,

    /// Tracing log level for hosts that call [`crate::telemetry::init`].
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Credentials {
    /// Load and validate credentials from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or invalid.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;
        Self::from_config(cfg)
    }

    /// Deserialise and validate credentials from a built configuration.
    pub fn from_config(cfg: config::Config) -> Result<Self> {
        let c: Credentials = cfg
            .try_deserialize()
            .context("failed to deserialise credentials")?;
        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.encoding_aes_key, "ENCODING_AES_KEY")?;
        ensure_non_empty(&self.sign_token, "SIGN_TOKEN")?;
        ensure_non_empty(&self.app_id, "APP_ID")?;

        let key_len = self.encoding_aes_key.chars().count();
        if key_len != ENCODED_KEY_LEN {
            anyhow::bail!(
                "ENCODING_AES_KEY must be {ENCODED_KEY_LEN} characters, got {key_len}"
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("encoding_aes_key", &"[REDACTED]")
            .field("sign_token", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
