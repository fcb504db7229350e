use crate::domain::stats::Stats;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-race history used to derive reliability, consistency and average position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceStats {
    pub races_completed: u32,
    pub races_dnf: u32,
    pub total_races: u32,
    /// One entry per `add_points` call, in report order.
    pub points_history: Vec<f64>,
    /// One entry per reported race, DNFs included. `None` when no
    /// finishing position was classified.
    pub position_history: Vec<Option<u32>>,
}

impl RaceStats {
    /// Finishing positions that carry a value, as floats for the stats helpers.
    pub fn recorded_positions(&self) -> Vec<f64> {
        self.position_history
            .iter()
            .flatten()
            .map(|p| f64::from(*p))
            .collect()
    }
}

/// A Formula 1 driver with season statistics for the fantasy game.
///
/// Identity fields are fixed at construction. Counters only grow through
/// [`Driver::set_race_result`], [`Driver::add_points`] and
/// [`Driver::add_pole_position`]; reliability and consistency are recomputed
/// after every race report and cannot be set directly.
///
/// There is no internal locking: callers that share a driver between tasks
/// must serialize the mutating calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) number: u32,
    pub(crate) team: String,
    pub(crate) nationality: String,
    pub(crate) price: Decimal,
    pub(crate) season: Option<i32>,

    // Performance metrics
    pub(crate) season_points: f64,
    pub(crate) wins: u32,
    pub(crate) podiums: u32,
    pub(crate) pole_positions: u32,

    // Derived metrics
    pub(crate) reliability: f64,
    pub(crate) consistency: f64,
    pub(crate) average_position: f64,

    // Most recent race
    pub(crate) last_race_position: Option<u32>,
    pub(crate) last_race_points: f64,

    pub(crate) stats: RaceStats,
}

impl Driver {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        number: u32,
        team: impl Into<String>,
        nationality: impl Into<String>,
        price: Decimal,
        season: Option<i32>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            number,
            team: team.into(),
            nationality: nationality.into(),
            price,
            season,
            season_points: 0.0,
            wins: 0,
            podiums: 0,
            pole_positions: 0,
            reliability: 0.0,
            consistency: 0.0,
            average_position: 0.0,
            last_race_position: None,
            last_race_points: 0.0,
            stats: RaceStats::default(),
        }
    }

    /// Add points to the season total and record them in the points history.
    ///
    /// Zero and negative values (penalties) are recorded as-is.
    pub fn add_points(&mut self, points: f64) {
        self.season_points += points;
        self.stats.points_history.push(points);
    }

    /// Record the outcome of one race.
    ///
    /// Must be called exactly once per race; repeated calls double-count.
    /// Out-of-range positions are accepted and simply never count as a
    /// podium or win.
    pub fn set_race_result(&mut self, position: Option<u32>, points: f64, dnf: bool) {
        self.last_race_position = position;
        self.last_race_points = points;

        self.stats.position_history.push(position);
        self.stats.total_races += 1;

        if dnf {
            self.stats.races_dnf += 1;
        } else {
            self.stats.races_completed += 1;
        }

        if matches!(position, Some(1..=3)) {
            self.podiums += 1;
        }
        if position == Some(1) {
            self.wins += 1;
        }

        self.add_points(points);
        self.calculate_reliability();
        self.calculate_consistency();
    }

    pub fn add_pole_position(&mut self) {
        self.pole_positions += 1;
    }

    /// Share of entered races finished without a DNF.
    ///
    /// Keeps the previous value while no race has been reported.
    pub fn calculate_reliability(&mut self) -> f64 {
        if self.stats.total_races > 0 {
            self.reliability =
                f64::from(self.stats.races_completed) / f64::from(self.stats.total_races);
        }
        self.reliability
    }

    /// Heuristic stability score from the coefficient of variation of
    /// finishing positions: `max(0, 1 - cv / 10)`.
    ///
    /// Fewer than two recorded positions, or a zero mean, score 0.0.
    pub fn calculate_consistency(&mut self) -> f64 {
        let positions = self.stats.recorded_positions();
        self.consistency = if positions.len() < 2 {
            0.0
        } else {
            match Stats::coefficient_of_variation(&positions) {
                Some(cv) => (1.0 - cv / 10.0).max(0.0),
                None => 0.0,
            }
        };
        self.consistency
    }

    /// Refresh and return the cached average finishing position (0.0 with no data).
    pub fn calculate_average_position(&mut self) -> f64 {
        self.average_position = self.current_average_position();
        self.average_position
    }

    fn current_average_position(&self) -> f64 {
        Stats::mean(&self.stats.recorded_positions()).unwrap_or(0.0)
    }

    /// Read-only view for the presentation layer.
    ///
    /// The average position is computed fresh from the history, so the
    /// snapshot is correct even if [`Driver::calculate_average_position`]
    /// has not been called since the last race. The cached value is not
    /// written back: [`Driver::average_position`] stays stale until
    /// `calculate_average_position` runs.
    ///
    /// Reliability and consistency are rounded to 3 places and the average
    /// position to 2, ties to even.
    pub fn snapshot(&self) -> DriverSnapshot {
        DriverSnapshot {
            id: self.id,
            name: self.name.clone(),
            number: self.number,
            team: self.team.clone(),
            nationality: self.nationality.clone(),
            price: self.price,
            season: self.season,
            season_points: self.season_points,
            wins: self.wins,
            podiums: self.podiums,
            pole_positions: self.pole_positions,
            reliability: Stats::round_to(self.reliability, 3),
            consistency: Stats::round_to(self.consistency, 3),
            average_position: Stats::round_to(self.current_average_position(), 2),
            last_race_position: self.last_race_position,
            last_race_points: self.last_race_points,
            stats: self.stats.clone(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn nationality(&self) -> &str {
        &self.nationality
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn season(&self) -> Option<i32> {
        self.season
    }

    pub fn season_points(&self) -> f64 {
        self.season_points
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn podiums(&self) -> u32 {
        self.podiums
    }

    pub fn pole_positions(&self) -> u32 {
        self.pole_positions
    }

    pub fn reliability(&self) -> f64 {
        self.reliability
    }

    pub fn consistency(&self) -> f64 {
        self.consistency
    }

    /// Last value stored by [`Driver::calculate_average_position`].
    pub fn average_position(&self) -> f64 {
        self.average_position
    }

    pub fn last_race_position(&self) -> Option<u32> {
        self.last_race_position
    }

    pub fn last_race_points(&self) -> f64 {
        self.last_race_points
    }

    pub fn stats(&self) -> &RaceStats {
        &self.stats
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Driver(id={}, name='{}', number={}, team='{}', points={})",
            self.id, self.name, self.number, self.team, self.season_points
        )
    }
}

/// Serialized driver state exposed to API handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSnapshot {
    pub id: i64,
    pub name: String,
    pub number: u32,
    pub team: String,
    pub nationality: String,
    pub price: Decimal,
    pub season: Option<i32>,
    pub season_points: f64,
    pub wins: u32,
    pub podiums: u32,
    pub pole_positions: u32,
    pub reliability: f64,
    pub consistency: f64,
    pub average_position: f64,
    pub last_race_position: Option<u32>,
    pub last_race_points: f64,
    pub stats: RaceStats,
}
