//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The slice of a user row the token core reads
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub role: Option<String>,
    pub auth_time: Option<DateTime<Utc>>,
}
