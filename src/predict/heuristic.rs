//! Closed-form fallback used when no trained bundle is available
//!
//! These formulas and constants are carried over unchanged from the legacy
//! dashboard. They have no documented derivation; do not tune them.

use crate::features::{BatsmanFeatures, BowlerFeatures, PlayerFeatures};

pub const BATSMAN_ADJUSTMENT: f64 = 0.95;
pub const BOWLER_DOT_WEIGHT: f64 = 0.6;
pub const ECONOMY_BASELINE: f64 = 6.0;
pub const ECONOMY_PENALTY_SLOPE: f64 = 0.05;

/// Clamp to a finite value >= 0. NaN maps to 0 and overflow saturates.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, f64::MAX)
    }
}

/// `max(0, balls_faced * (strike_rate/100) * (1 - dot_ball_pct/100) * 0.95)`
pub fn batsman(f: &BatsmanFeatures) -> f64 {
    let runs = f.balls_faced
        * (f.strike_rate / 100.0)
        * (1.0 - f.dot_ball_pct / 100.0)
        * BATSMAN_ADJUSTMENT;
    non_negative(runs)
}

/// `max(0, overs * (dot_ball_pct/100) * 0.6 - max(0, (economy - 6) * 0.05))`
pub fn bowler(f: &BowlerFeatures) -> f64 {
    let base = f.overs * (f.dot_ball_pct / 100.0) * BOWLER_DOT_WEIGHT;
    let penalty = ((f.economy - ECONOMY_BASELINE) * ECONOMY_PENALTY_SLOPE).max(0.0);
    non_negative(base - penalty)
}

pub fn predict(features: &PlayerFeatures) -> f64 {
    match features {
        PlayerFeatures::Batsman(f) => batsman(f),
        PlayerFeatures::Bowler(f) => bowler(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_batsman_scenario() {
        let runs = batsman(&BatsmanFeatures::new(30.0, 150.0, 25.0));
        assert!(close(runs, 32.0625), "got {}", runs);
    }

    #[test]
    fn test_bowler_scenario() {
        // base = 4 * 0.4 * 0.6 = 0.96, penalty = 1.5 * 0.05 = 0.075
        let wickets = bowler(&BowlerFeatures::new(4.0, 7.5, 40.0));
        assert!(close(wickets, 0.885), "got {}", wickets);
    }

    #[test]
    fn test_bowler_no_penalty_below_baseline() {
        let wickets = bowler(&BowlerFeatures::new(4.0, 4.0, 50.0));
        assert!(close(wickets, 4.0 * 0.5 * 0.6));
    }

    #[test]
    fn test_bowler_penalty_clamped_at_zero() {
        // Penalty (94 * 0.05 = 4.7) far exceeds base (0.6)
        let wickets = bowler(&BowlerFeatures::new(1.0, 100.0, 100.0));
        assert_eq!(wickets, 0.0);
    }

    #[test]
    fn test_batsman_clamped_for_out_of_range_input() {
        // dot_ball_pct above 100 makes the raw formula negative
        assert_eq!(batsman(&BatsmanFeatures::new(30.0, 150.0, 120.0)), 0.0);
        assert_eq!(batsman(&BatsmanFeatures::new(-10.0, 150.0, 25.0)), 0.0);
    }

    #[test]
    fn test_always_non_negative_and_finite() {
        let values = [0.0, 0.5, 1.0, 6.0, 25.0, 100.0, 150.0, 1e6];
        for &a in &values {
            for &b in &values {
                for &dot in &[0.0, 10.0, 50.0, 99.0, 100.0] {
                    let runs = batsman(&BatsmanFeatures::new(a, b, dot));
                    let wickets = bowler(&BowlerFeatures::new(a, b, dot));
                    assert!(runs >= 0.0 && runs.is_finite());
                    assert!(wickets >= 0.0 && wickets.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_matches_formula_exactly() {
        for &(bf, sr, dot) in &[(12.0, 80.0, 40.0), (55.0, 132.7, 33.3), (1.0, 100.0, 0.0)] {
            let expected = (bf * (sr / 100.0) * (1.0 - dot / 100.0) * 0.95f64).max(0.0);
            assert_eq!(batsman(&BatsmanFeatures::new(bf, sr, dot)), expected);
        }
        for &(o, eco, dot) in &[(4.0, 8.25, 45.0), (10.0, 5.5, 30.0), (2.0, 12.0, 10.0)] {
            let expected = (o * (dot / 100.0) * 0.6 - ((eco - 6.0) * 0.05f64).max(0.0)).max(0.0);
            assert_eq!(bowler(&BowlerFeatures::new(o, eco, dot)), expected);
        }
    }

    #[test]
    fn test_overflow_saturates() {
        let runs = batsman(&BatsmanFeatures::new(1e300, 1e300, 0.0));
        assert_eq!(runs, f64::MAX);
    }

    #[test]
    fn test_predict_dispatch() {
        let f = PlayerFeatures::Bowler(BowlerFeatures::new(4.0, 7.5, 40.0));
        assert!(close(predict(&f), 0.885));
    }
}
