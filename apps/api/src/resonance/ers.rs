//! Engagement Resonance Score (ERS).
//!
//! `raw = 0.2·likes + 0.5·comments + 0.8·shares`, then log-dampened so a single
//! viral outlier cannot dominate the corpus: `min(round(ln(1 + raw) · 10, 2), 100)`.

use serde::{Deserialize, Serialize};

/// Upper bound of the score.
pub const MAX_ERS: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            likes: 0.2,
            comments: 0.5,
            shares: 0.8,
        }
    }
}

/// Computes the ERS for a post with the default engagement weights.
pub fn calculate_ers(likes: u64, comments: u64, shares: u64) -> f64 {
    calculate_ers_weighted(likes, comments, shares, &EngagementWeights::default())
}

pub fn calculate_ers_weighted(
    likes: u64,
    comments: u64,
    shares: u64,
    weights: &EngagementWeights,
) -> f64 {
    let raw = weights.likes * likes as f64
        + weights.comments * comments as f64
        + weights.shares * shares as f64;
    round_to(raw.ln_1p() * 10.0, 2).min(MAX_ERS)
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_engagement_is_zero() {
        assert_eq!(calculate_ers(0, 0, 0), 0.0);
    }

    #[test]
    fn test_reference_value() {
        // raw = 20 + 10 + 4 = 34 → ln(35) * 10 = 35.5534...
        let score = calculate_ers(100, 20, 5);
        assert!((score - 35.55).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_capped_at_one_hundred() {
        // ln(1 + raw) * 10 > 100 needs raw > e^10 ≈ 22026
        assert_eq!(calculate_ers(10_000_000, 0, 0), MAX_ERS);
        assert_eq!(calculate_ers(u64::MAX, u64::MAX, u64::MAX), MAX_ERS);
    }

    #[test]
    fn test_monotonic_in_each_input() {
        let samples = [0_u64, 1, 2, 5, 10, 50, 100, 1_000, 25_000, 1_000_000];
        for pair in samples.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            assert!(calculate_ers(lo, 7, 3) <= calculate_ers(hi, 7, 3));
            assert!(calculate_ers(7, lo, 3) <= calculate_ers(7, hi, 3));
            assert!(calculate_ers(7, 3, lo) <= calculate_ers(7, 3, hi));
        }
    }

    #[test]
    fn test_always_within_bounds() {
        for likes in [0_u64, 3, 900, 40_000] {
            for comments in [0_u64, 12, 7_000] {
                for shares in [0_u64, 1, 90_000] {
                    let score = calculate_ers(likes, comments, shares);
                    assert!((0.0..=MAX_ERS).contains(&score), "Score was {score}");
                }
            }
        }
    }

    #[test]
    fn test_shares_weigh_more_than_likes() {
        assert!(calculate_ers(0, 0, 10) > calculate_ers(10, 0, 0));
        assert!(calculate_ers(0, 10, 0) > calculate_ers(10, 0, 0));
    }

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(35.5534, 2), 35.55);
        assert_eq!(round_to(0.4449, 3), 0.445);
    }
}
