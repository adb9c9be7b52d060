//! Session token validation
//!
//! Validation is an ordered pipeline. Each step short-circuits, and every
//! failure, including directory outages, ends in [`ValidationResult::Invalid`].
//!
//! | Step | Check |
//! |------|-------|
//! | 0 | token present and non-empty |
//! | 1 | HS256 signature, structure, expiry |
//! | 2 | `userId` and `userRole` claims present |
//! | 3 | user exists in the directory |
//! | 4 | elevated role claims match the stored role |
//! | 5 | `iat` equals the stored auth time exactly |
//!
//! Nothing is cached: every call reads current user state.

use chrono::{DateTime, Utc};
use jsonwebtoken::Validation;
use std::sync::Arc;
use std::time::Duration;
use tessera_db::{DbError, UserDirectory};
use tessera_types::{Role, UserId};

use crate::claims::PresentedClaims;
use crate::crypto::SigningKey;
use crate::Rejection;

/// Identity established by a valid token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    /// The claimed role, already checked against stored state
    pub role: Role,
}

/// Outcome of validating a token
///
/// Identity is only reachable through `Valid`, so an invalid result can never
/// be mistaken for a partially trusted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(Principal),
    Invalid,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Valid(principal) => Some(principal),
            Self::Invalid => None,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.principal().map(|p| p.user_id)
    }

    pub fn user_role(&self) -> Option<Role> {
        self.principal().map(|p| p.role)
    }

    pub fn into_principal(self) -> Option<Principal> {
        match self {
            Self::Valid(principal) => Some(principal),
            Self::Invalid => None,
        }
    }
}

/// Validates session tokens against current directory state
pub struct TokenValidator<D: UserDirectory + ?Sized> {
    key: SigningKey,
    directory: Arc<D>,
    validation: Validation,
}

impl<D: UserDirectory + ?Sized> TokenValidator<D> {
    /// Create a new validator
    ///
    /// `leeway` is the clock-skew tolerance applied to `exp`.
    pub fn new(key: SigningKey, directory: Arc<D>, leeway: Duration) -> Self {
        let mut validation = key.validation();
        validation.leeway = leeway.as_secs();
        Self {
            key,
            directory,
            validation,
        }
    }

    /// Validate a presented token.
    ///
    /// Never fails and never panics; any doubt yields `Invalid`. The reason
    /// is emitted as a tracing event and not returned.
    pub async fn validate(&self, token: Option<&str>) -> ValidationResult {
        match self.check(token).await {
            Ok(principal) => {
                tracing::debug!(
                    user_id = %principal.user_id,
                    role = %principal.role,
                    "Session token accepted"
                );
                ValidationResult::Valid(principal)
            }
            Err(rejection) => {
                rejection.log();
                ValidationResult::Invalid
            }
        }
    }

    /// Validate the value of an `Authorization` header
    pub async fn validate_header(&self, header: Option<&str>) -> ValidationResult {
        self.validate(bearer_token(header)).await
    }

    /// Run the pipeline, returning the first rejection hit
    pub(crate) async fn check(&self, token: Option<&str>) -> Result<Principal, Rejection> {
        // Step 0: presence
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(Rejection::MissingToken)?;

        // Step 1: signature, structure, expiry
        let claims: PresentedClaims = self.key.verify(token, &self.validation)?;

        // Step 2: claim completeness
        let user_id = claims
            .user_id
            .as_ref()
            .ok_or(Rejection::MissingClaim("userId"))?;
        let claimed_role = claims
            .user_role
            .as_deref()
            .ok_or(Rejection::MissingClaim("userRole"))?;
        let user_id = user_id
            .parse()
            .ok_or_else(|| Rejection::Malformed("userId claim is not an integer".to_string()))?;

        // Step 3: subject existence
        if !self.directory.exists(user_id).await.map_err(unavailable)? {
            return Err(Rejection::UnknownUser);
        }

        // Step 4: role consistency
        let role = self.check_role(user_id, claimed_role).await?;

        // Step 5: auth-time binding
        self.check_auth_time(user_id, claims.iat).await?;

        Ok(Principal { user_id, role })
    }

    async fn check_role(&self, user_id: UserId, claimed: &str) -> Result<Role, Rejection> {
        let claimed: Role = claimed
            .parse()
            .map_err(|_| Rejection::UnrecognizedRole(claimed.to_string()))?;

        match claimed {
            Role::User => Ok(claimed),
            Role::Admin | Role::Owner => {
                let stored = self
                    .directory
                    .get_role(user_id)
                    .await
                    .map_err(unavailable)?
                    .ok_or(Rejection::RoleNotRecorded)?;

                if stored != claimed || !claimed.is_elevated() {
                    return Err(Rejection::RoleMismatch { claimed, stored });
                }
                Ok(claimed)
            }
        }
    }

    async fn check_auth_time(&self, user_id: UserId, iat: i64) -> Result<(), Rejection> {
        let stored = match self.directory.get_auth_time(user_id).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Err(Rejection::AuthTimeNotRecorded),
            // Deleted between step 3 and here
            Err(DbError::NotFound) => return Err(Rejection::UnknownUser),
            Err(e) => return Err(unavailable(e)),
        };

        let issued_at = DateTime::<Utc>::from_timestamp(iat, 0)
            .ok_or_else(|| Rejection::Malformed("iat out of range".to_string()))?;

        // Exact instant equality; a stored value differing by any fraction
        // of a second is a different auth event.
        if stored != issued_at {
            tracing::debug!(
                user_id = %user_id,
                stored = %stored,
                issued_at = %issued_at,
                "Auth time mismatch"
            );
            return Err(Rejection::AuthTimeMismatch);
        }
        Ok(())
    }
}

impl<D: UserDirectory + ?Sized> Clone for TokenValidator<D> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            directory: Arc::clone(&self.directory),
            validation: self.validation.clone(),
        }
    }
}

impl<D: UserDirectory + ?Sized> std::fmt::Debug for TokenValidator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("key", &self.key)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

fn unavailable(err: DbError) -> Rejection {
    Rejection::DirectoryUnavailable(err.to_string())
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty token.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
