//! Session token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_types::{Role, User, UserId};

use crate::config::TOKEN_LIFETIME;
use crate::AuthError;

/// Claims minted into every session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Role at issuance
    #[serde(rename = "userRole")]
    pub user_role: Role,
    /// Issued-at (seconds); equal to the user's stored auth time
    pub iat: i64,
    /// Expiration (seconds)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for a user from the auth time read back from the directory.
    ///
    /// Token time claims have whole-second resolution, so an auth time with a
    /// sub-second part is refused: the resulting token could never match it.
    pub fn for_auth_time(user: &User, auth_time: DateTime<Utc>) -> Result<Self, AuthError> {
        if auth_time.timestamp_subsec_nanos() != 0 {
            return Err(AuthError::UnrepresentableAuthTime(auth_time));
        }
        let iat = auth_time.timestamp();
        let lifetime = i64::try_from(TOKEN_LIFETIME.as_secs())
            .map_err(|_| AuthError::Configuration("token lifetime out of range".to_string()))?;

        Ok(Self {
            user_id: user.id,
            user_role: user.role,
            iat,
            exp: iat + lifetime,
        })
    }

    /// Issued-at as an instant
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiration as an instant
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// `userId` as it may appear in a presented token: a JSON number or a
/// decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserIdClaim {
    Number(i64),
    Text(String),
}

impl UserIdClaim {
    pub(crate) fn parse(&self) -> Option<UserId> {
        match self {
            Self::Number(n) => Some(UserId(*n)),
            Self::Text(s) => UserId::parse(s).ok(),
        }
    }
}

/// Claims decoded from an untrusted token, before any semantic checks.
///
/// Identity claims are optional here so that a missing claim is told apart
/// from a malformed one.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PresentedClaims {
    #[serde(rename = "userId", default)]
    pub user_id: Option<UserIdClaim>,
    #[serde(rename = "userRole", default)]
    pub user_role: Option<String>,
    pub iat: i64,
}
