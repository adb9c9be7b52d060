//! Auth errors

use chrono::{DateTime, Utc};
use tessera_db::DbError;
use tessera_types::Role;
use thiserror::Error;
use tracing::Level;

/// Errors from token issuance and service setup
///
/// Validation never returns these; it reports [`Rejection`]s through logs and
/// hands the caller a plain invalid result.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The user directory failed or could not be reached
    #[error("directory error: {0}")]
    Directory(String),

    /// The directory accepted the auth time write but reads back nothing
    #[error("auth time was not recorded")]
    AuthTimeNotRecorded,

    /// A fresh auth time write was not observed on re-read
    #[error("auth time write was not observed")]
    StaleAuthTime,

    /// The stored auth time has a sub-second part a token cannot carry
    #[error("auth time {0} cannot be represented in a token")]
    UnrepresentableAuthTime(DateTime<Utc>),

    /// Token encoding failed
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Directory(_) => 503,
            Self::AuthTimeNotRecorded
            | Self::StaleAuthTime
            | Self::UnrepresentableAuthTime(_)
            | Self::Signing(_)
            | Self::Configuration(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Directory(_) => "DIRECTORY_ERROR",
            Self::AuthTimeNotRecorded => "AUTH_TIME_NOT_RECORDED",
            Self::StaleAuthTime => "STALE_AUTH_TIME",
            Self::UnrepresentableAuthTime(_) => "UNREPRESENTABLE_AUTH_TIME",
            Self::Signing(_) => "SIGNING_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        tracing::error!("Directory error: {}", err);
        Self::Directory(err.to_string())
    }
}

/// Broad category of a rejection, used to pick a log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionClass {
    /// Absent or empty token
    Input,
    /// Bad signature, malformed encoding, or expiry
    Cryptographic,
    /// Token disagrees with current user state; the expected result of revocation
    Consistency,
    /// The directory failed while checking
    Collaborator,
}

/// Why a presented token was rejected
///
/// Kept for diagnostics only. Callers of `validate` see nothing but an
/// invalid result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("token is required")]
    MissingToken,

    #[error("token expired")]
    Expired,

    #[error("signature verification failed")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("missing {0} claim")]
    MissingClaim(&'static str),

    #[error("user does not exist or was deleted")]
    UnknownUser,

    #[error("unrecognized role claim: {0}")]
    UnrecognizedRole(String),

    #[error("no role recorded for user")]
    RoleNotRecorded,

    #[error("role mismatch: claimed {claimed}, stored {stored}")]
    RoleMismatch { claimed: Role, stored: Role },

    #[error("no auth time recorded for user")]
    AuthTimeNotRecorded,

    #[error("token issue time does not match auth time")]
    AuthTimeMismatch,

    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

impl Rejection {
    /// Category of this rejection
    pub fn class(&self) -> RejectionClass {
        match self {
            Self::MissingToken => RejectionClass::Input,
            Self::Expired | Self::BadSignature | Self::Malformed(_) => {
                RejectionClass::Cryptographic
            }
            Self::MissingClaim(_)
            | Self::UnknownUser
            | Self::UnrecognizedRole(_)
            | Self::RoleNotRecorded
            | Self::RoleMismatch { .. }
            | Self::AuthTimeNotRecorded
            | Self::AuthTimeMismatch => RejectionClass::Consistency,
            Self::DirectoryUnavailable(_) => RejectionClass::Collaborator,
        }
    }

    /// Level this rejection is logged at
    pub fn level(&self) -> Level {
        match self.class() {
            RejectionClass::Input | RejectionClass::Consistency => Level::DEBUG,
            RejectionClass::Cryptographic => match self {
                Self::BadSignature => Level::WARN,
                _ => Level::DEBUG,
            },
            RejectionClass::Collaborator => Level::ERROR,
        }
    }

    /// Emit a leveled diagnostic event for this rejection
    pub(crate) fn log(&self) {
        let level = self.level();
        if level == Level::ERROR {
            tracing::error!(reason = %self, "Session token validation could not complete");
        } else if level == Level::WARN {
            tracing::warn!(reason = %self, "Rejected session token");
        } else {
            tracing::debug!(reason = %self, "Rejected session token");
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Rejection {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            _ => Self::Malformed(err.to_string()),
        }
    }
}
