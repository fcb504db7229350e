//! Race result ingestion.
//!
//! Applies race results and pole awards from the scoring feed to stored
//! drivers. `Driver` has no internal locking, so every load-modify-save
//! cycle runs under a per-driver async lock: two results for the same
//! driver never interleave, while different drivers proceed in parallel.

use crate::domain::driver::{Driver, DriverSnapshot};
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::DriverRepository;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// One driver's outcome in one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub driver_id: i64,
    pub position: Option<u32>,
    pub points: f64,
    #[serde(default)]
    pub dnf: bool,
}

impl RaceResult {
    pub fn finished(driver_id: i64, position: u32, points: f64) -> Self {
        Self {
            driver_id,
            position: Some(position),
            points,
            dnf: false,
        }
    }

    pub fn retired(driver_id: i64) -> Self {
        Self {
            driver_id,
            position: None,
            points: 0.0,
            dnf: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoleAward {
    pub driver_id: i64,
}

pub struct RaceResultIngestor {
    repository: Arc<dyn DriverRepository>,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl RaceResultIngestor {
    pub fn new(repository: Arc<dyn DriverRepository>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn driver_lock(&self, driver_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(driver_id).or_default().clone()
    }

    /// Load the driver guarded by `lock`. An unknown id drops its lock entry
    /// unless another task is still waiting on it.
    async fn load_driver(&self, driver_id: i64, lock: &Arc<Mutex<()>>) -> Result<Driver> {
        match self.repository.find_by_id(driver_id).await? {
            Some(driver) => Ok(driver),
            None => {
                let mut locks = self.locks.lock().await;
                // One reference in the map, one held by the caller
                if Arc::strong_count(lock) <= 2 {
                    locks.remove(&driver_id);
                }
                Err(RepositoryError::DriverNotFound { id: driver_id }.into())
            }
        }
    }

    /// Apply one race result and persist the driver.
    ///
    /// The caller must submit each (race, driver) pair once; a repeat is
    /// counted as another race.
    pub async fn record_result(&self, result: &RaceResult) -> Result<DriverSnapshot> {
        let lock = self.driver_lock(result.driver_id).await;
        let _guard = lock.lock().await;

        let mut driver = self.load_driver(result.driver_id, &lock).await?;

        driver.set_race_result(result.position, result.points, result.dnf);
        driver.calculate_average_position();
        self.repository.save(&driver).await?;

        debug!(
            "Recorded result for driver {}: position={:?} points={} dnf={}",
            result.driver_id, result.position, result.points, result.dnf
        );
        Ok(driver.snapshot())
    }

    pub async fn record_pole(&self, award: PoleAward) -> Result<DriverSnapshot> {
        let lock = self.driver_lock(award.driver_id).await;
        let _guard = lock.lock().await;

        let mut driver = self.load_driver(award.driver_id, &lock).await?;

        driver.add_pole_position();
        self.repository.save(&driver).await?;

        debug!("Recorded pole position for driver {}", award.driver_id);
        Ok(driver.snapshot())
    }

    /// Apply every result of one race in order. Stops at the first failure;
    /// results already applied stay applied.
    pub async fn record_round(&self, results: &[RaceResult]) -> Result<Vec<DriverSnapshot>> {
        let mut snapshots = Vec::with_capacity(results.len());
        for result in results {
            snapshots.push(self.record_result(result).await?);
        }
        info!("Recorded {} race results", snapshots.len());
        Ok(snapshots)
    }
}
