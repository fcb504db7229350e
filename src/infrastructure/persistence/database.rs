use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Sqlite, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

/// Shared connection pool; cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Connect and create the schema, using default pool settings.
    pub async fn new(db_url: &str) -> Result<Self> {
        let config = DatabaseConfig {
            url: db_url.to_string(),
            ..DatabaseConfig::default()
        };
        let db = Self::connect(&config).await?;
        db.init().await?;
        Ok(db)
    }

    /// Open the pool described by `config` without touching the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let in_memory = config.is_in_memory();

        // Ensure the directory exists if it's a file path
        if !in_memory && let Some(path_part) = config.url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let mut options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid database URL: {}", config.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }
        if !config.echo {
            options = options.disable_statement_logging();
        }

        // Every connection to :memory: is a separate database, so keep exactly
        // one alive for the lifetime of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
        };

        let pool = pool_options
            .test_before_acquire(config.test_before_acquire)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", config.url);

        Ok(Self { pool })
    }

    /// Create all tables. Safe to call on every startup.
    pub async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Drivers Table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drivers (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                number INTEGER NOT NULL,
                team TEXT NOT NULL,
                nationality TEXT NOT NULL,
                price TEXT NOT NULL,
                season INTEGER,
                season_points REAL NOT NULL DEFAULT 0,
                wins INTEGER NOT NULL DEFAULT 0,
                podiums INTEGER NOT NULL DEFAULT 0,
                pole_positions INTEGER NOT NULL DEFAULT 0,
                reliability REAL NOT NULL DEFAULT 0,
                consistency REAL NOT NULL DEFAULT 0,
                average_position REAL NOT NULL DEFAULT 0,
                last_race_position INTEGER,
                last_race_points REAL NOT NULL DEFAULT 0,
                stats_json TEXT NOT NULL,
                updated_at INTEGER DEFAULT (strftime('%s', 'now'))
            );
            CREATE INDEX IF NOT EXISTS idx_drivers_season
            ON drivers (season);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create drivers table")?;

        // 2. Users Table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'player',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create users table")?;

        info!("Database schema initialized.");
        Ok(())
    }

    /// Drop every table. Destroys all data; meant for development and tests.
    pub async fn drop_all(&self) -> Result<()> {
        warn!("Dropping all database tables");

        sqlx::query(
            r#"
            DROP INDEX IF EXISTS idx_drivers_season;
            DROP TABLE IF EXISTS drivers;
            DROP TABLE IF EXISTS users;
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to drop tables")?;

        info!("Database schema dropped.");
        Ok(())
    }

    /// Check out a pooled connection. It returns to the pool on drop.
    pub async fn session(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .context("Failed to acquire database session")
    }

    /// Begin a transaction. Rolled back on drop unless committed.
    pub async fn transaction(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    /// Close the pool and wait for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed.");
    }
}
