mod driver_repository;
mod user_repository;

pub use driver_repository::SqliteDriverRepository;
pub use user_repository::SqliteUserRepository;
