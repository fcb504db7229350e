//! Fantasy F1 data service
//!
//! Loads the environment's settings bundle, opens the database and runs
//! one administrative command.
//!
//! # Usage
//! ```sh
//! APP_ENV=production SECRET_KEY=... fantasy-f1 serve
//! fantasy-f1 --env testing show-config
//! fantasy-f1 record-result --driver 1 --position 3 --points 15
//! ```
//!
//! # Environment Variables
//! - `APP_ENV` (or `FLASK_ENV`) - development, testing or production (default: development)
//! - `DATABASE_URL` - SQLite URL (default: sqlite://fantasy_f1.db)
//! - `LOG_LEVEL` - default log level when `RUST_LOG` is unset (default: INFO)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fantasy_f1::application::bootstrap::persistence::PersistenceBootstrap;
use fantasy_f1::application::ingestion::{PoleAward, RaceResult, RaceResultIngestor};
use fantasy_f1::config::{Config, EnvVars, Environment};
use fantasy_f1::domain::driver::Driver;
use fantasy_f1::domain::errors::RepositoryError;
use fantasy_f1::domain::repositories::{DriverRepository, UserRepository};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Environment bundle to load (overrides APP_ENV)
    #[arg(long, global = true)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all tables
    InitDb,

    /// Drop all tables (destroys data)
    DropDb {
        /// Required to confirm
        #[arg(long)]
        yes: bool,
    },

    /// Open the database and hold the pool until Ctrl+C
    Serve,

    /// Print the active settings bundle as JSON (secrets omitted)
    ShowConfig,

    /// Register a driver for a season
    AddDriver {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        team: String,
        #[arg(long)]
        nationality: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        season: Option<i32>,
    },

    /// Record one race result for a driver
    RecordResult {
        #[arg(long)]
        driver: i64,
        /// Finishing position; omit for an unclassified DNF
        #[arg(long)]
        position: Option<u32>,
        #[arg(long, default_value = "0")]
        points: f64,
        #[arg(long)]
        dnf: bool,
    },

    /// Credit a pole position to a driver
    RecordPole {
        #[arg(long)]
        driver: i64,
    },

    /// Print a driver snapshot as JSON
    ShowDriver {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.env {
        Some(environment) => Config::for_environment(environment, &EnvVars::process())?,
        None => Config::from_env()?,
    };

    init_tracing(&config);

    info!(
        "{} {} starting (environment: {})",
        config.app_name,
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    run(cli.command, config).await
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.filter_directive()));

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::InitDb => {
            let persistence = PersistenceBootstrap::init(&config.database).await?;
            persistence.db.close().await;
        }
        Commands::DropDb { yes } => {
            if !yes {
                anyhow::bail!("Refusing to drop tables without --yes");
            }
            let persistence = PersistenceBootstrap::connect(&config.database).await?;
            persistence.db.drop_all().await?;
            persistence.db.close().await;
        }
        Commands::Serve => {
            let persistence = PersistenceBootstrap::init(&config.database).await?;
            let drivers = persistence.driver_repository.count().await?;
            let users = persistence.user_repository.count().await?;
            info!("Database ready: {} drivers, {} users", drivers, users);

            info!("Server running. Press Ctrl+C to shutdown.");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received. Exiting...");

            persistence.db.close().await;
        }
        Commands::AddDriver {
            id,
            name,
            number,
            team,
            nationality,
            price,
            season,
        } => {
            let persistence = PersistenceBootstrap::init(&config.database).await?;
            let driver = Driver::new(id, name, number, team, nationality, price, season);
            persistence
                .driver_repository
                .save(&driver)
                .await
                .context("Failed to register driver")?;
            info!("Registered {}", driver);
            persistence.db.close().await;
        }
        Commands::RecordResult {
            driver,
            position,
            points,
            dnf,
        } => {
            let persistence = PersistenceBootstrap::init(&config.database).await?;
            let ingestor = RaceResultIngestor::new(persistence.driver_repository.clone());
            let snapshot = ingestor
                .record_result(&RaceResult {
                    driver_id: driver,
                    position,
                    points,
                    dnf,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            persistence.db.close().await;
        }
        Commands::RecordPole { driver } => {
            let persistence = PersistenceBootstrap::init(&config.database).await?;
            let ingestor = RaceResultIngestor::new(persistence.driver_repository.clone());
            let snapshot = ingestor.record_pole(PoleAward { driver_id: driver }).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            persistence.db.close().await;
        }
        Commands::ShowDriver { id } => {
            let persistence = PersistenceBootstrap::init(&config.database).await?;
            let driver = persistence
                .driver_repository
                .find_by_id(id)
                .await?
                .ok_or(RepositoryError::DriverNotFound { id })?;
            println!("{}", serde_json::to_string_pretty(&driver.snapshot())?);
            persistence.db.close().await;
        }
    }

    Ok(())
}
