//! Tessera DB - User directory abstractions
//!
//! The token core never touches storage directly. It talks to a
//! [`UserDirectory`], which this crate defines together with two backends:
//! an in-process [`MemoryUserDirectory`] and a SQLx-based [`PgUserDirectory`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_db::{create_pool, PgUserDirectory, UserDirectory};
//!
//! let pool = create_pool("postgres://localhost/tessera").await?;
//! let directory = PgUserDirectory::new(pool);
//!
//! let known = directory.exists(user_id).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::{MemoryUserDirectory, StoragePrecision};
pub use models::UserRow;
pub use pg::PgUserDirectory;
pub use pool::{create_pool, create_pool_with_max_connections, DbPool};
pub use repo::UserDirectory;
