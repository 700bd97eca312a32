//! # Privacy Scorer
//!
//! Rates a withdrawal plan on a 0–100 scale from four signals:
//!
//! | Signal | Sub-score | Weight |
//! |--------|-----------|--------|
//! | fragmentation | `min(100, split_count / 5 * 100)` | 0.30 |
//! | address uniqueness | `100` if `unique >= split_count`, else `unique / split_count * 100` | 0.25 |
//! | aging | `min(100, min_aging_hours / 48 * 100)` | 0.25 |
//! | anonymity pool | `min(100, pool_size / 1000 * 100)` | 0.20 |
//!
//! The result is the rounded weighted sum, clamped to `[0, 100]`.

use serde::{Deserialize, Serialize};

const SPLIT_TARGET: f64 = 5.0;
const AGING_TARGET_HOURS: f64 = 48.0;
const POOL_TARGET: f64 = 1000.0;

const SPLIT_WEIGHT: f64 = 0.30;
const ADDRESS_WEIGHT: f64 = 0.25;
const AGING_WEIGHT: f64 = 0.25;
const POOL_WEIGHT: f64 = 0.20;

/// Inputs to the privacy score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrivacyInputs {
    /// Number of fragments.
    pub split_count: u32,
    /// Number of distinct target addresses.
    pub unique_addresses: u32,
    /// Minimum aging before first release, in hours.
    pub min_aging_hours: f64,
    /// Size of the anonymity pool the fragments blend into.
    pub pool_size: u64,
}

/// Stateless composite privacy scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivacyScorer;

impl PrivacyScorer {
    /// Compute the composite score.
    pub fn score(&self, inputs: &PrivacyInputs) -> u8 {
        let split = capped(f64::from(inputs.split_count) / SPLIT_TARGET);

        let address = if inputs.unique_addresses >= inputs.split_count {
            100.0
        } else {
            f64::from(inputs.unique_addresses) / f64::from(inputs.split_count) * 100.0
        };

        let aging_hours = if inputs.min_aging_hours.is_finite() {
            inputs.min_aging_hours.max(0.0)
        } else {
            0.0
        };
        let aging = capped(aging_hours / AGING_TARGET_HOURS);
        let pool = capped(inputs.pool_size as f64 / POOL_TARGET);

        let weighted = split * SPLIT_WEIGHT
            + address * ADDRESS_WEIGHT
            + aging * AGING_WEIGHT
            + pool * POOL_WEIGHT;

        weighted.round().clamp(0.0, 100.0) as u8
    }
}

fn capped(ratio: f64) -> f64 {
    (ratio * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(split_count: u32, unique_addresses: u32, min_aging_hours: f64, pool_size: u64) -> u8 {
        PrivacyScorer.score(&PrivacyInputs {
            split_count,
            unique_addresses,
            min_aging_hours,
            pool_size,
        })
    }

    #[test]
    fn saturated_inputs_score_100() {
        assert_eq!(score(5, 5, 48.0, 1000), 100);
        assert_eq!(score(12, 12, 200.0, 1_000_000), 100);
    }

    #[test]
    fn single_unaged_fragment_scores_low() {
        assert!(score(1, 0, 0.0, 0) < 50);
        assert_eq!(score(1, 0, 0.0, 0), 6);
    }

    #[test]
    fn default_plan_profile() {
        // 5 fragments, 5 addresses, 24h aging, empty pool:
        // 30 + 25 + 12.5 + 0 = 67.5 -> 68
        assert_eq!(score(5, 5, 24.0, 0), 68);
    }

    #[test]
    fn reused_addresses_reduce_score() {
        assert!(score(4, 2, 48.0, 1000) < score(4, 4, 48.0, 1000));
    }

    #[test]
    fn degenerate_inputs_stay_in_range() {
        assert_eq!(score(0, 0, 0.0, 0), 25);
        assert!(score(0, 0, -10.0, 0) <= 100);
        assert!(score(3, 3, f64::NAN, 0) <= 100);
        assert!(score(3, 3, f64::INFINITY, 0) <= 100);
    }
}
