use fantasy_f1::application::bootstrap::persistence::PersistenceBootstrap;
use fantasy_f1::application::ingestion::{PoleAward, RaceResult, RaceResultIngestor};
use fantasy_f1::config::{Config, EnvVars, Environment};
use fantasy_f1::domain::driver::Driver;
use fantasy_f1::domain::repositories::{DriverRepository, UserRepository};
use fantasy_f1::domain::user::{User, UserRole};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

fn testing_config() -> Config {
    Config::for_environment(Environment::Testing, &EnvVars::from_map(HashMap::new()))
        .expect("testing bundle needs no environment")
}

#[tokio::test]
async fn test_season_round_trip_through_sqlite() {
    let config = testing_config();
    let persistence = PersistenceBootstrap::init(&config.database).await.unwrap();
    let drivers = persistence.driver_repository.clone();

    drivers
        .save(&Driver::new(1, "Max Verstappen", 1, "Red Bull", "Dutch", dec!(30.5), Some(2025)))
        .await
        .unwrap();
    drivers
        .save(&Driver::new(4, "Lando Norris", 4, "McLaren", "British", dec!(28), Some(2025)))
        .await
        .unwrap();

    let ingestor = RaceResultIngestor::new(drivers.clone());

    // Round 1
    ingestor.record_pole(PoleAward { driver_id: 4 }).await.unwrap();
    ingestor
        .record_round(&[RaceResult::finished(4, 1, 25.0), RaceResult::finished(1, 2, 18.0)])
        .await
        .unwrap();

    // Round 2
    ingestor
        .record_round(&[RaceResult::finished(1, 1, 25.0), RaceResult::retired(4)])
        .await
        .unwrap();

    let norris = drivers.find_by_id(4).await.unwrap().unwrap();
    let snapshot = norris.snapshot();
    assert_eq!(snapshot.wins, 1);
    assert_eq!(snapshot.pole_positions, 1);
    assert_eq!(snapshot.reliability, 0.5);
    assert_eq!(snapshot.stats.position_history, vec![Some(1), None]);
    assert_eq!(snapshot.average_position, 1.0);

    let max = drivers.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(max.season_points(), 43.0);
    assert_eq!(max.podiums(), 2);
    assert_eq!(max.reliability(), 1.0);
    // positions [2, 1]: mean 1.5, sigma 0.5
    assert!((max.consistency() - (1.0 - (0.5 / 1.5) / 10.0)).abs() < 1e-9);

    assert_eq!(drivers.find_by_season(2025).await.unwrap().len(), 2);

    persistence.db.close().await;
}

#[tokio::test]
async fn test_concurrent_ingestion_against_sqlite() {
    let config = testing_config();
    let persistence = PersistenceBootstrap::init(&config.database).await.unwrap();
    let drivers = persistence.driver_repository.clone();

    for id in [10, 11] {
        drivers
            .save(&Driver::new(id, format!("Driver {id}"), id as u32, "Alpine", "French", dec!(7), Some(2025)))
            .await
            .unwrap();
    }

    let ingestor = Arc::new(RaceResultIngestor::new(drivers.clone()));
    let mut handles = Vec::new();
    for race in 0..10u32 {
        for id in [10, 11] {
            let ingestor = ingestor.clone();
            handles.push(tokio::spawn(async move {
                ingestor
                    .record_result(&RaceResult::finished(id, race + 1, 2.0))
                    .await
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for id in [10, 11] {
        let driver = drivers.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(driver.stats().total_races, 10);
        assert_eq!(driver.season_points(), 20.0);
    }

    persistence.db.close().await;
}

#[tokio::test]
async fn test_users_persist_with_roles() {
    let config = testing_config();
    let persistence = PersistenceBootstrap::init(&config.database).await.unwrap();
    let users = persistence.user_repository.clone();

    let admin = User::new(1, "race-control", "rc@example.com", "hash", UserRole::Admin);
    let mut player = User::new(2, "backmarker", "bm@example.com", "hash", UserRole::default());
    users.save(&admin).await.unwrap();
    users.save(&player).await.unwrap();

    player.deactivate();
    users.save(&player).await.unwrap();

    let all = users.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].is_admin());
    assert!(all[1].is_player());
    assert!(!all[1].is_active);

    let snapshot = users.find_by_username("race-control").await.unwrap().unwrap().snapshot();
    assert_eq!(snapshot.role, UserRole::Admin);

    persistence.db.close().await;
}

#[tokio::test]
async fn test_drop_and_reinitialize() {
    let config = testing_config();
    let persistence = PersistenceBootstrap::init(&config.database).await.unwrap();

    persistence
        .driver_repository
        .save(&Driver::new(3, "Daniel Ricciardo", 3, "RB", "Australian", dec!(5), None))
        .await
        .unwrap();

    persistence.db.drop_all().await.unwrap();
    assert!(persistence.driver_repository.count().await.is_err());

    persistence.db.init().await.unwrap();
    assert_eq!(persistence.driver_repository.count().await.unwrap(), 0);

    persistence.db.close().await;
}
