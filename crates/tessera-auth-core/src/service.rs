//! Token service - ties together issuance, validation, and credential-change invalidation

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tessera_db::UserDirectory;
use tessera_types::{User, UserId};

use crate::{
    config::TokenConfig,
    issuer::{IssuedToken, TokenIssuer},
    validator::{TokenValidator, ValidationResult},
    AuthError,
};

/// Token service
///
/// Provides a single entry point for the authentication boundary:
/// - Login handlers call [`issue`](Self::issue)
/// - Request middleware calls [`validate`](Self::validate) or
///   [`validate_header`](Self::validate_header)
/// - Credential changes call [`invalidate_sessions`](Self::invalidate_sessions)
pub struct TokenService<D: UserDirectory + ?Sized> {
    config: TokenConfig,
    issuer: TokenIssuer<D>,
    validator: TokenValidator<D>,
    directory: Arc<D>,
}

impl<D: UserDirectory + ?Sized> TokenService<D> {
    /// Create a new token service
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if the signing secret is unusable.
    pub fn new(config: TokenConfig, directory: Arc<D>) -> Result<Self, AuthError> {
        let key = config.signing_key().map_err(|e| {
            tracing::error!("Invalid token signing key: {}", e);
            AuthError::Configuration(e.to_string())
        })?;

        Ok(Self {
            issuer: TokenIssuer::new(key.clone(), Arc::clone(&directory)),
            validator: TokenValidator::new(key, Arc::clone(&directory), config.leeway),
            directory,
            config,
        })
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Issue a session token for a freshly authenticated user
    pub async fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        self.issuer.issue(user).await
    }

    /// Invalidate every outstanding token for a user
    ///
    /// Records a new auth time; returns the value now stored.
    pub async fn invalidate_sessions(&self, user_id: UserId) -> Result<DateTime<Utc>, AuthError> {
        self.issuer.rotate_auth_time(user_id).await
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a bearer token
    pub async fn validate(&self, token: Option<&str>) -> ValidationResult {
        self.validator.validate(token).await
    }

    /// Validate an `Authorization` header value
    pub async fn validate_header(&self, header: Option<&str>) -> ValidationResult {
        self.validator.validate_header(header).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn issuer(&self) -> &TokenIssuer<D> {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator<D> {
        &self.validator
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }
}

impl<D: UserDirectory + ?Sized> Clone for TokenService<D> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            issuer: self.issuer.clone(),
            validator: self.validator.clone(),
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D: UserDirectory + ?Sized> std::fmt::Debug for TokenService<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
