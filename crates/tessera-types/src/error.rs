//! Common error types

use thiserror::Error;

/// Error parsing a role string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Error parsing a user ID string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid user id: {0}")]
pub struct UserIdParseError(pub String);
