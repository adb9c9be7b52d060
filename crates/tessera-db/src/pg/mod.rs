//! PostgreSQL directory implementation

mod user;

pub use user::PgUserDirectory;
