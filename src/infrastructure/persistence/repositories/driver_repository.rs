use crate::domain::driver::{Driver, RaceStats};
use crate::domain::repositories::DriverRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

pub struct SqliteDriverRepository {
    pool: SqlitePool,
}

impl SqliteDriverRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for SqliteDriverRepository {
    async fn save(&self, driver: &Driver) -> Result<()> {
        let stats_json =
            serde_json::to_string(&driver.stats).context("Failed to serialize driver stats")?;

        sqlx::query(
            r#"
            INSERT INTO drivers (
                id, name, number, team, nationality, price, season,
                season_points, wins, podiums, pole_positions,
                reliability, consistency, average_position,
                last_race_position, last_race_points, stats_json, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, strftime('%s', 'now'))
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                number = excluded.number,
                team = excluded.team,
                nationality = excluded.nationality,
                price = excluded.price,
                season = excluded.season,
                season_points = excluded.season_points,
                wins = excluded.wins,
                podiums = excluded.podiums,
                pole_positions = excluded.pole_positions,
                reliability = excluded.reliability,
                consistency = excluded.consistency,
                average_position = excluded.average_position,
                last_race_position = excluded.last_race_position,
                last_race_points = excluded.last_race_points,
                stats_json = excluded.stats_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(driver.id)
        .bind(&driver.name)
        .bind(i64::from(driver.number))
        .bind(&driver.team)
        .bind(&driver.nationality)
        .bind(driver.price.to_string()) // Decimal as TEXT, no float rounding
        .bind(driver.season)
        .bind(driver.season_points)
        .bind(i64::from(driver.wins))
        .bind(i64::from(driver.podiums))
        .bind(i64::from(driver.pole_positions))
        .bind(driver.reliability)
        .bind(driver.consistency)
        .bind(driver.average_position)
        .bind(driver.last_race_position.map(i64::from))
        .bind(driver.last_race_points)
        .bind(stats_json)
        .execute(&self.pool)
        .await
        .context("Failed to save driver")?;

        debug!("Persisted Driver {}", driver.id);
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Driver>> {
        let row = sqlx::query("SELECT * FROM drivers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load driver")?;

        row.map(|r| map_row_to_driver(&r)).transpose()
    }

    async fn find_by_season(&self, season: i32) -> Result<Vec<Driver>> {
        let rows = sqlx::query("SELECT * FROM drivers WHERE season = ? ORDER BY id ASC")
            .bind(season)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_row_to_driver).collect()
    }

    async fn get_all(&self) -> Result<Vec<Driver>> {
        let rows = sqlx::query("SELECT * FROM drivers ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_row_to_driver).collect()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete driver")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM drivers")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}

fn get_u32(row: &SqliteRow, column: &str) -> Result<u32> {
    let raw: i64 = row.try_get(column)?;
    u32::try_from(raw).with_context(|| format!("Column {} out of range: {}", column, raw))
}

fn map_row_to_driver(row: &SqliteRow) -> Result<Driver> {
    let price_str: String = row.try_get("price")?;
    let stats_json: String = row.try_get("stats_json")?;
    let stats: RaceStats =
        serde_json::from_str(&stats_json).context("Failed to parse driver stats")?;

    Ok(Driver {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        number: get_u32(row, "number")?,
        team: row.try_get("team")?,
        nationality: row.try_get("nationality")?,
        price: Decimal::from_str(&price_str)
            .with_context(|| format!("Invalid driver price: {}", price_str))?,
        season: row.try_get("season")?,
        season_points: row.try_get("season_points")?,
        wins: get_u32(row, "wins")?,
        podiums: get_u32(row, "podiums")?,
        pole_positions: get_u32(row, "pole_positions")?,
        reliability: row.try_get("reliability")?,
        consistency: row.try_get("consistency")?,
        average_position: row.try_get("average_position")?,
        last_race_position: row
            .try_get::<Option<i64>, _>("last_race_position")?
            .map(|p| {
                u32::try_from(p)
                    .with_context(|| format!("Column last_race_position out of range: {}", p))
            })
            .transpose()?,
        last_race_points: row.try_get("last_race_points")?,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IN_MEMORY_DATABASE_URL;
    use crate::infrastructure::persistence::Database;
    use rust_decimal_macros::dec;

    async fn setup() -> SqliteDriverRepository {
        let db = Database::new(IN_MEMORY_DATABASE_URL).await.unwrap();
        SqliteDriverRepository::new(db.pool)
    }

    fn create_test_driver(id: i64, season: Option<i32>) -> Driver {
        Driver::new(id, format!("Driver {}", id), id as u32, "McLaren", "British", dec!(23.75), season)
    }

    #[tokio::test]
    async fn test_save_and_load_preserves_history() {
        let repo = setup().await;

        let mut driver = create_test_driver(4, Some(2025));
        driver.set_race_result(Some(1), 25.0, false);
        driver.set_race_result(None, 0.0, true);
        driver.set_race_result(Some(3), 15.5, false);
        driver.add_pole_position();
        driver.calculate_average_position();
        repo.save(&driver).await.unwrap();

        let loaded = repo.find_by_id(4).await.unwrap().expect("driver exists");
        assert_eq!(loaded, driver);
        assert_eq!(loaded.stats().position_history, vec![Some(1), None, Some(3)]);
        assert_eq!(loaded.price(), dec!(23.75));
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let repo = setup().await;

        let mut driver = create_test_driver(1, Some(2025));
        repo.save(&driver).await.unwrap();
        driver.set_race_result(Some(2), 18.0, false);
        repo.save(&driver).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        let loaded = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(loaded.season_points(), 18.0);
        assert_eq!(loaded.podiums(), 1);
    }

    #[tokio::test]
    async fn test_find_by_season_and_delete() {
        let repo = setup().await;
        repo.save(&create_test_driver(3, Some(2024))).await.unwrap();
        repo.save(&create_test_driver(1, Some(2025))).await.unwrap();
        repo.save(&create_test_driver(2, Some(2025))).await.unwrap();
        repo.save(&create_test_driver(9, None)).await.unwrap();

        let season: Vec<i64> = repo
            .find_by_season(2025)
            .await
            .unwrap()
            .iter()
            .map(Driver::id)
            .collect();
        assert_eq!(season, vec![1, 2]);

        assert!(repo.delete(2).await.unwrap());
        assert!(!repo.delete(2).await.unwrap());
        assert_eq!(repo.get_all().await.unwrap().len(), 3);
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_counter_is_an_error() {
        let repo = setup().await;
        repo.save(&create_test_driver(5, Some(2025))).await.unwrap();

        sqlx::query("UPDATE drivers SET wins = -1 WHERE id = 5")
            .execute(&repo.pool)
            .await
            .unwrap();
        let err = repo.find_by_id(5).await.unwrap_err();
        assert!(err.to_string().contains("wins"));

        sqlx::query("UPDATE drivers SET wins = 0, last_race_position = 4294967296 WHERE id = 5")
            .execute(&repo.pool)
            .await
            .unwrap();
        let err = repo.find_by_id(5).await.unwrap_err();
        assert!(err.to_string().contains("last_race_position"));
    }
}
