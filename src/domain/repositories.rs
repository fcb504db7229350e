//! Repository Pattern Abstractions
//!
//! Persistence traits for the domain models. Business logic only sees these
//! traits; SQLite and in-memory implementations live in `infrastructure`.
//!
//! # Example
//!
//! ```rust,no_run
//! use fantasy_f1::domain::driver::Driver;
//! use fantasy_f1::domain::repositories::DriverRepository;
//! use fantasy_f1::infrastructure::InMemoryDriverRepository;
//! use rust_decimal_macros::dec;
//!
//! # async {
//! let repo = InMemoryDriverRepository::new();
//! let driver = Driver::new(1, "Max Verstappen", 1, "Red Bull", "Dutch", dec!(30), Some(2025));
//! repo.save(&driver).await?;
//! let found = repo.find_by_id(1).await?;
//! # anyhow::Ok(())
//! # };
//! ```

use crate::domain::driver::Driver;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

/// Repository for persisting and retrieving drivers with their statistics
#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Insert or replace a driver
    async fn save(&self, driver: &Driver) -> Result<()>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Driver>>;

    /// All drivers entered in a season, ordered by id
    async fn find_by_season(&self, season: i32) -> Result<Vec<Driver>>;

    /// All drivers, ordered by id
    async fn get_all(&self) -> Result<Vec<Driver>>;

    /// Remove a driver. Returns false when no row matched.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}

/// Repository for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace a user
    async fn save(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn get_all(&self) -> Result<Vec<User>>;

    async fn count(&self) -> Result<usize>;
}
