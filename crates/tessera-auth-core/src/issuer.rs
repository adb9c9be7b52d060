//! Session token issuance
//!
//! A token is only ever minted against an auth time that has been durably
//! recorded and read back from the directory.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Arc;
use tessera_db::UserDirectory;
use tessera_types::{User, UserId};

use crate::claims::SessionClaims;
use crate::crypto::SigningKey;
use crate::AuthError;

/// A freshly signed session token and the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS string handed to the client
    pub token: String,
    /// Claims embedded in the token
    pub claims: SessionClaims,
}

impl IssuedToken {
    /// The token string
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Consume and return the token string
    pub fn into_string(self) -> String {
        self.token
    }
}

/// Issues session tokens bound to the user's stored auth time
pub struct TokenIssuer<D: UserDirectory + ?Sized> {
    key: SigningKey,
    directory: Arc<D>,
}

impl<D: UserDirectory + ?Sized> TokenIssuer<D> {
    /// Create a new issuer
    pub fn new(key: SigningKey, directory: Arc<D>) -> Self {
        Self { key, directory }
    }

    /// Record a fresh auth time for the user and sign a token against it.
    ///
    /// The new auth time is strictly later than the stored one, so a login
    /// never writes back a value an earlier token was bound to. The write is
    /// awaited to completion before the auth time is read back, and the
    /// token carries the read-back value, so whatever normalization the
    /// store applies is reflected in `iat`.
    ///
    /// # Errors
    /// Fails if the directory write or a read fails, if nothing is read back,
    /// or if the stored value cannot be carried by a token. No token is
    /// produced in any of these cases.
    pub async fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let previous = self.directory.get_auth_time(user.id).await?;
        let auth_time = next_auth_time(previous, current_auth_time());

        self.directory.set_auth_time(user.id, auth_time).await?;

        let stored = self
            .directory
            .get_auth_time(user.id)
            .await?
            .ok_or_else(|| {
                tracing::error!(user_id = %user.id, "Auth time missing right after write");
                AuthError::AuthTimeNotRecorded
            })?;

        let claims = SessionClaims::for_auth_time(user, stored)?;

        let token = self.key.sign(&claims).map_err(|e| {
            tracing::error!("Failed to sign session token: {}", e);
            AuthError::Signing(e.to_string())
        })?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            issued_at = claims.iat,
            "Issued session token"
        );

        Ok(IssuedToken { token, claims })
    }

    /// Record a new auth time that differs from the current one.
    ///
    /// Every token issued before this call stops validating. Call it on any
    /// credential-affecting event (password change, reset, forced logout).
    /// Returns the auth time now stored.
    pub async fn rotate_auth_time(&self, user_id: UserId) -> Result<DateTime<Utc>, AuthError> {
        let previous = self.directory.get_auth_time(user_id).await?;
        let next = next_auth_time(previous, current_auth_time());

        self.directory.set_auth_time(user_id, next).await?;

        let stored = self
            .directory
            .get_auth_time(user_id)
            .await?
            .ok_or(AuthError::AuthTimeNotRecorded)?;

        if Some(stored) == previous {
            tracing::error!(user_id = %user_id, "Auth time unchanged after rotation");
            return Err(AuthError::StaleAuthTime);
        }

        tracing::info!(user_id = %user_id, "Rotated auth time; outstanding tokens invalidated");
        Ok(stored)
    }
}

impl<D: UserDirectory + ?Sized> Clone for TokenIssuer<D> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D: UserDirectory + ?Sized> std::fmt::Debug for TokenIssuer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Current instant at token resolution (whole seconds)
pub(crate) fn current_auth_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Pick an auth time strictly later than `previous` at token resolution.
///
/// Two writes inside the same second would otherwise store the same value,
/// and tokens bound to it would stay (or become again) valid.
fn next_auth_time(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) => {
            let floor = prev.trunc_subsecs(0) + Duration::seconds(1);
            now.max(floor)
        }
        None => now,
    }
}
