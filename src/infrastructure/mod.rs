pub mod persistence;
pub mod repositories;

pub use persistence::{Database, SqliteDriverRepository, SqliteUserRepository};
pub use repositories::{InMemoryDriverRepository, InMemoryUserRepository};
