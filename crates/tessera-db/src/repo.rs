//! Repository traits
//!
//! Define the async directory interface the token core reads user state from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tessera_types::{Role, UserId};

use crate::error::DbResult;

/// User directory trait
///
/// Implementations must give read-your-writes consistency for a single
/// caller: once `set_auth_time` has returned `Ok`, a subsequent
/// `get_auth_time` for the same user observes the written value (after any
/// precision normalization the store applies).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Record the auth time for a user
    ///
    /// Returns `DbError::NotFound` if the user does not exist.
    async fn set_auth_time(&self, user_id: UserId, auth_time: DateTime<Utc>) -> DbResult<()>;

    /// Read the stored auth time for a user
    ///
    /// Returns `DbError::NotFound` if the user does not exist, and `Ok(None)`
    /// if the user exists but has never had an auth time recorded.
    async fn get_auth_time(&self, user_id: UserId) -> DbResult<Option<DateTime<Utc>>>;

    /// Check whether a user exists
    async fn exists(&self, user_id: UserId) -> DbResult<bool>;

    /// Get the stored role for a user, if any
    async fn get_role(&self, user_id: UserId) -> DbResult<Option<Role>>;
}
