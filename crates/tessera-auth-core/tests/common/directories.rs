//! Directory doubles for failure and call-count tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tessera_db::{DbError, DbResult, MemoryUserDirectory, UserDirectory};
use tessera_types::{Role, UserId};

/// Which directory operation should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    SetAuthTime,
    GetAuthTime,
    Exists,
    GetRole,
}

/// Wraps a memory directory and fails one operation with `Unavailable`
#[derive(Clone)]
pub struct FailingDirectory {
    inner: MemoryUserDirectory,
    failure: FailurePoint,
}

impl FailingDirectory {
    pub fn new(inner: MemoryUserDirectory, failure: FailurePoint) -> Self {
        Self { inner, failure }
    }

    fn fail_at(&self, point: FailurePoint) -> DbResult<()> {
        if self.failure == point {
            Err(DbError::Unavailable(format!("{point:?} is down")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserDirectory for FailingDirectory {
    async fn set_auth_time(&self, user_id: UserId, auth_time: DateTime<Utc>) -> DbResult<()> {
        self.fail_at(FailurePoint::SetAuthTime)?;
        self.inner.set_auth_time(user_id, auth_time).await
    }

    async fn get_auth_time(&self, user_id: UserId) -> DbResult<Option<DateTime<Utc>>> {
        self.fail_at(FailurePoint::GetAuthTime)?;
        self.inner.get_auth_time(user_id).await
    }

    async fn exists(&self, user_id: UserId) -> DbResult<bool> {
        self.fail_at(FailurePoint::Exists)?;
        self.inner.exists(user_id).await
    }

    async fn get_role(&self, user_id: UserId) -> DbResult<Option<Role>> {
        self.fail_at(FailurePoint::GetRole)?;
        self.inner.get_role(user_id).await
    }
}

/// Counts every directory call
#[derive(Default, Clone)]
pub struct CountingDirectory {
    inner: MemoryUserDirectory,
    calls: Arc<AtomicUsize>,
    auth_time_reads: Arc<AtomicUsize>,
}

impl CountingDirectory {
    pub fn new(inner: MemoryUserDirectory) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn auth_time_reads(&self) -> usize {
        self.auth_time_reads.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserDirectory for CountingDirectory {
    async fn set_auth_time(&self, user_id: UserId, auth_time: DateTime<Utc>) -> DbResult<()> {
        self.hit();
        self.inner.set_auth_time(user_id, auth_time).await
    }

    async fn get_auth_time(&self, user_id: UserId) -> DbResult<Option<DateTime<Utc>>> {
        self.hit();
        self.auth_time_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_auth_time(user_id).await
    }

    async fn exists(&self, user_id: UserId) -> DbResult<bool> {
        self.hit();
        self.inner.exists(user_id).await
    }

    async fn get_role(&self, user_id: UserId) -> DbResult<Option<Role>> {
        self.hit();
        self.inner.get_role(user_id).await
    }
}
