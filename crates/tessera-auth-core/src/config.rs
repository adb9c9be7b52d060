//! Configuration types for the token service

use std::time::Duration;

use crate::crypto::{KeyError, SigningKey};

/// Lifetime of every session token, counted from its issued-at claim
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Token service configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret shared by issuer and validator
    signing_secret: String,
    /// Clock-skew leeway applied to the `exp` check
    pub leeway: Duration,
}

impl TokenConfig {
    /// Create a new config without checking the secret
    ///
    /// The secret is checked when the signing key is built.
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            leeway: Duration::ZERO,
        }
    }

    /// Create a new config, rejecting secrets too short for HS256
    pub fn try_new(signing_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self::new(signing_secret);
        config.signing_key()?;
        Ok(config)
    }

    /// Load configuration from the environment (and a `.env` file if present)
    ///
    /// - `TOKEN_SIGNING_SECRET` (required, at least 32 bytes)
    /// - `TOKEN_LEEWAY_SECS` (optional, default 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret =
            lookup("TOKEN_SIGNING_SECRET").ok_or(ConfigError::Missing("TOKEN_SIGNING_SECRET"))?;

        let leeway_secs: u64 = lookup("TOKEN_LEEWAY_SECS")
            .unwrap_or_else(|| "0".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("TOKEN_LEEWAY_SECS"))?;

        Ok(Self::try_new(secret)?.with_leeway(Duration::from_secs(leeway_secs)))
    }

    /// Set leeway
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Build the signing key from the configured secret
    pub fn signing_key(&self) -> Result<SigningKey, KeyError> {
        SigningKey::new(self.signing_secret.as_bytes())
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("signing_secret", &"<redacted>")
            .field("leeway", &self.leeway)
            .finish()
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid signing key: {0}")]
    Key(#[from] KeyError),
}
