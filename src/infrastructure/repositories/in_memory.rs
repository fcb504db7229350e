//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the repository traits defined
//! in `domain::repositories`, backed by `Arc<RwLock>`.
//!
//! Data is lost on restart. Used by tests and for running the ingestion
//! pipeline without a database.

use crate::domain::driver::Driver;
use crate::domain::repositories::{DriverRepository, UserRepository};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of DriverRepository, keyed and ordered by id
pub struct InMemoryDriverRepository {
    drivers: Arc<RwLock<BTreeMap<i64, Driver>>>,
}

impl InMemoryDriverRepository {
    pub fn new() -> Self {
        Self {
            drivers: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryDriverRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriverRepository for InMemoryDriverRepository {
    async fn save(&self, driver: &Driver) -> Result<()> {
        self.drivers.write().await.insert(driver.id(), driver.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Driver>> {
        Ok(self.drivers.read().await.get(&id).cloned())
    }

    async fn find_by_season(&self, season: i32) -> Result<Vec<Driver>> {
        let drivers = self.drivers.read().await;
        Ok(drivers
            .values()
            .filter(|d| d.season() == Some(season))
            .cloned()
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<Driver>> {
        Ok(self.drivers.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.drivers.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.drivers.read().await.len())
    }
}

/// In-memory implementation of UserRepository
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            anyhow::bail!("Username already taken: {}", user.username);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;
    use rust_decimal_macros::dec;

    fn create_test_driver(id: i64, season: Option<i32>) -> Driver {
        Driver::new(id, format!("Driver {}", id), id as u32, "Williams", "Thai", dec!(8.5), season)
    }

    #[tokio::test]
    async fn test_driver_repository_save_and_retrieve() {
        let repo = InMemoryDriverRepository::new();

        let mut driver = create_test_driver(23, Some(2025));
        driver.set_race_result(Some(9), 2.0, false);
        repo.save(&driver).await.unwrap();

        let loaded = repo.find_by_id(23).await.unwrap().unwrap();
        assert_eq!(loaded, driver);
        assert!(repo.find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_driver_repository_season_filter_and_order() {
        let repo = InMemoryDriverRepository::new();
        for (id, season) in [(5, Some(2025)), (2, Some(2025)), (7, Some(2024)), (1, None)] {
            repo.save(&create_test_driver(id, season)).await.unwrap();
        }

        let ids: Vec<i64> = repo
            .find_by_season(2025)
            .await
            .unwrap()
            .iter()
            .map(Driver::id)
            .collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(repo.count().await.unwrap(), 4);

        assert!(repo.delete(7).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_user_repository_unique_username() {
        let repo = InMemoryUserRepository::new();
        let user = User::new(1, "box-box", "a@example.com", "h", UserRole::Player);
        repo.save(&user).await.unwrap();

        // Re-saving the same account is fine
        repo.save(&user).await.unwrap();

        let clash = User::new(2, "box-box", "b@example.com", "h", UserRole::Player);
        assert!(repo.save(&clash).await.is_err());

        let found = repo.find_by_username("box-box").await.unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }
}
