//! In-memory user directory
//!
//! Backed by a `DashMap`. Writes are truncated to a configurable
//! [`StoragePrecision`] so callers can exercise the same normalization a real
//! column type would apply.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tessera_types::{Role, UserId};

use crate::error::{DbError, DbResult};
use crate::repo::UserDirectory;

/// Resolution at which auth times are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoragePrecision {
    Nanoseconds,
    Microseconds,
    #[default]
    Milliseconds,
    Seconds,
}

impl StoragePrecision {
    /// Number of fractional-second digits kept
    pub const fn subsec_digits(&self) -> u16 {
        match self {
            Self::Nanoseconds => 9,
            Self::Microseconds => 6,
            Self::Milliseconds => 3,
            Self::Seconds => 0,
        }
    }

    /// Truncate an instant to this precision
    pub fn normalize(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        instant.trunc_subsecs(self.subsec_digits())
    }
}

#[derive(Debug, Clone, Default)]
struct Entry {
    role: Option<Role>,
    auth_time: Option<DateTime<Utc>>,
}

/// In-memory user directory
#[derive(Debug, Default, Clone)]
pub struct MemoryUserDirectory {
    users: Arc<DashMap<UserId, Entry>>,
    precision: StoragePrecision,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory that stores auth times at the given precision
    pub fn with_precision(precision: StoragePrecision) -> Self {
        Self {
            users: Arc::default(),
            precision,
        }
    }

    /// Storage precision in effect
    pub fn precision(&self) -> StoragePrecision {
        self.precision
    }

    /// Insert or replace a user with no recorded auth time
    pub fn insert_user(&self, user_id: UserId, role: Option<Role>) {
        self.users.insert(
            user_id,
            Entry {
                role,
                auth_time: None,
            },
        );
    }

    /// Remove a user, returning whether it existed
    pub fn remove_user(&self, user_id: UserId) -> bool {
        self.users.remove(&user_id).is_some()
    }

    /// Change a user's stored role
    pub fn set_role(&self, user_id: UserId, role: Option<Role>) -> DbResult<()> {
        let mut entry = self.users.get_mut(&user_id).ok_or(DbError::NotFound)?;
        entry.role = role;
        Ok(())
    }

    /// Number of users stored
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn set_auth_time(&self, user_id: UserId, auth_time: DateTime<Utc>) -> DbResult<()> {
        let mut entry = self.users.get_mut(&user_id).ok_or(DbError::NotFound)?;
        entry.auth_time = Some(self.precision.normalize(auth_time));
        Ok(())
    }

    async fn get_auth_time(&self, user_id: UserId) -> DbResult<Option<DateTime<Utc>>> {
        self.users
            .get(&user_id)
            .map(|entry| entry.auth_time)
            .ok_or(DbError::NotFound)
    }

    async fn exists(&self, user_id: UserId) -> DbResult<bool> {
        Ok(self.users.contains_key(&user_id))
    }

    async fn get_role(&self, user_id: UserId) -> DbResult<Option<Role>> {
        Ok(self.users.get(&user_id).and_then(|entry| entry.role))
    }
}
