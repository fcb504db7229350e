use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::repositories::{DriverRepository, UserRepository};
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::{
    SqliteDriverRepository, SqliteUserRepository,
};

pub struct PersistenceHandle {
    pub db: Database,
    pub driver_repository: Arc<dyn DriverRepository>,
    pub user_repository: Arc<dyn UserRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    /// Connect, create the schema and build the repositories.
    pub async fn init(config: &DatabaseConfig) -> Result<PersistenceHandle> {
        let handle = Self::connect(config).await?;
        handle
            .db
            .init()
            .await
            .context("Failed to initialize database schema")?;
        Ok(handle)
    }

    /// Connect and build the repositories without creating tables.
    pub async fn connect(config: &DatabaseConfig) -> Result<PersistenceHandle> {
        info!("Initializing Database at {}", config.url);

        let db = Database::connect(config)
            .await
            .context("Failed to initialize database")?;

        let driver_repository = Arc::new(SqliteDriverRepository::new(db.pool.clone()));
        let user_repository = Arc::new(SqliteUserRepository::new(db.pool.clone()));

        Ok(PersistenceHandle {
            db,
            driver_repository,
            user_repository,
        })
    }
}
