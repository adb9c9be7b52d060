//! Tessera Types - Shared domain types
//!
//! This crate contains domain types used across tessera crates:
//! - User identity (`UserId`, `User`)
//! - The closed role set (`Role`)

pub mod error;
pub mod user;

pub use error::*;
pub use user::*;
