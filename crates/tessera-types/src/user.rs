//! User types

use serde::{Deserialize, Serialize};

use crate::error::{RoleParseError, UserIdParseError};

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from its decimal string form
    pub fn parse(s: &str) -> Result<Self, UserIdParseError> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| UserIdParseError(s.to_string()))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// User role
///
/// The set is closed: any string outside it fails to parse. Matching on this
/// enum must stay exhaustive so a new variant is forced through every
/// privilege check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Baseline role
    User,
    /// Administrator
    Admin,
    /// Account owner
    Owner,
}

impl Role {
    /// Wire name of the role
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Whether this role carries privileges above the baseline
    pub const fn is_elevated(&self) -> bool {
        match self {
            Self::User => false,
            Self::Admin | Self::Owner => true,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    // Exact match only: "Admin" or " admin" are not roles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// An authenticated user as seen by token issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

impl User {
    /// Create a new user
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}
