use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Shared statistics utilities for finishing-position calculations.
pub struct Stats;

impl Stats {
    /// Arithmetic mean, or `None` for an empty sample.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Population variance (divides by n, not n-1).
    pub fn population_variance(values: &[f64]) -> Option<f64> {
        let mean = Self::mean(values)?;
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some(sum_sq / values.len() as f64)
    }

    pub fn std_dev(values: &[f64]) -> Option<f64> {
        Self::population_variance(values).map(f64::sqrt)
    }

    /// Coefficient of variation (sigma / mean).
    ///
    /// Returns `None` when the sample is empty or its mean is exactly zero.
    pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
        let mean = Self::mean(values)?;
        if mean == 0.0 {
            return None;
        }
        Self::std_dev(values).map(|sigma| sigma / mean)
    }

    /// Round to `places` decimal places, ties to even.
    ///
    /// Rounds the exact binary value of `value`, so `2.675` (stored as
    /// 2.67499...) goes down while a true tie such as `2.125` goes to 2.12.
    /// Non-finite input is returned unchanged.
    pub fn round_to(value: f64, places: u32) -> f64 {
        Decimal::from_f64_retain(value)
            .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven))
            .and_then(|d| d.to_f64())
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let positions = vec![1.0, 5.0];
        assert_eq!(Stats::mean(&positions), Some(3.0));
        assert_eq!(Stats::population_variance(&positions), Some(4.0));
        assert_eq!(Stats::std_dev(&positions), Some(2.0));

        assert_eq!(Stats::mean(&[]), None);
        assert_eq!(Stats::population_variance(&[]), None);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let cv = Stats::coefficient_of_variation(&[1.0, 5.0]).unwrap();
        assert!((cv - 2.0 / 3.0).abs() < 1e-12);

        // Flat sample has no spread
        assert_eq!(Stats::coefficient_of_variation(&[4.0, 4.0, 4.0]), Some(0.0));

        // Zero mean is undefined
        assert_eq!(Stats::coefficient_of_variation(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(Stats::round_to(0.93333, 3), 0.933);
        assert_eq!(Stats::round_to(2.666666, 2), 2.67);
        assert_eq!(Stats::round_to(1.0, 3), 1.0);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(Stats::round_to(2.125, 2), 2.12);
        assert_eq!(Stats::round_to(2.375, 2), 2.38);
        assert_eq!(Stats::round_to(0.0625, 3), 0.062);
        assert_eq!(Stats::round_to(0.5, 0), 0.0);

        // Not a tie once the binary representation is taken into account
        assert_eq!(Stats::round_to(2.675, 2), 2.67);
        assert_eq!(Stats::round_to(0.9333333333333333, 3), 0.933);

        assert!(Stats::round_to(f64::NAN, 2).is_nan());
    }
}
