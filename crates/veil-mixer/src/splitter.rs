//! # Amount Splitter
//!
//! Partitions a total into a variable number of non-round, strictly positive
//! fragments whose sum equals the total exactly.
//!
//! ## Algorithm
//!
//! 1. Totals below the minimum fragmentable unit (0.1) are returned whole.
//!    A zero total is an error, since no fragment may be zero.
//! 2. Fragment count is drawn from a band chosen by magnitude, or pinned by
//!    the caller.
//! 3. One weight per fragment: `u^2 + 0.1` with `u` uniform in `[0, 1)`.
//!    Squaring skews the split toward unequal parts.
//! 4. Each weighted share is perturbed by up to ±5%, truncated to two
//!    decimals, then offset by an odd number of hundredths of a cent taken
//!    from [`NOISE_OFFSETS`].
//! 5. The residual `total - sum` is added to the last fragment.
//!
//! All arithmetic after step 4 is on integer units of 10^-4, so the result
//! sums to the total exactly.
//!
//! ## Modes
//!
//! [`AmountSplitter::split`] uses the thread RNG. [`AmountSplitter::split_deterministic`]
//! seeds a `ChaCha20Rng` and reproduces the same fragments for the same
//! `(total, count, seed)` on every platform. Both run [`AmountSplitter::split_with_rng`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use veil_core::Amount;

use crate::config::MixerConfig;
use crate::error::MixerError;

/// Odd hundredths-of-a-cent offsets, in units of 10^-4.
pub const NOISE_OFFSETS: [u64; 8] = [1, 3, 7, 9, 11, 13, 17, 19];

/// Largest fragment count the splitter accepts.
pub const MAX_FRAGMENTS: usize = 32;

/// Relative half-width of the multiplicative noise.
const NOISE_FRACTION: f64 = 0.05;

/// Weight floor added after squaring.
const WEIGHT_FLOOR: f64 = 0.1;

/// Units per cent (two-decimal truncation granularity).
const UNITS_PER_CENT: f64 = 100.0;

/// Splits totals into sum-preserving fragments.
#[derive(Debug, Clone)]
pub struct AmountSplitter {
    min_fragmentable: Amount,
}

impl Default for AmountSplitter {
    fn default() -> Self {
        Self::new(&MixerConfig::default())
    }
}

impl AmountSplitter {
    /// Create a splitter from configuration.
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            min_fragmentable: config.min_fragmentable,
        }
    }

    /// Fragment-count band for a total: `<0.5 → 2..=3`, `<2 → 3..=4`,
    /// `<10 → 3..=5`, otherwise `4..=7`.
    pub fn count_band(total: Amount) -> (usize, usize) {
        match total.units() {
            u if u < 5_000 => (2, 3),
            u if u < 20_000 => (3, 4),
            u if u < 100_000 => (3, 5),
            _ => (4, 7),
        }
    }

    /// Split with the thread RNG and a magnitude-selected count band.
    pub fn split(&self, total: Amount) -> Result<Vec<Amount>, MixerError> {
        let (min, max) = Self::count_band(total);
        self.split_with_rng(total, min, max, &mut rand::thread_rng())
    }

    /// Split with the thread RNG and caller-pinned count bounds.
    pub fn split_with_bounds(
        &self,
        total: Amount,
        min_count: usize,
        max_count: usize,
    ) -> Result<Vec<Amount>, MixerError> {
        self.split_with_rng(total, min_count, max_count, &mut rand::thread_rng())
    }

    /// Reproducible split into exactly `count` fragments.
    ///
    /// Same `(total, count, seed)` yields the same output on every run.
    pub fn split_deterministic(
        &self,
        total: Amount,
        count: usize,
        seed: u64,
    ) -> Result<Vec<Amount>, MixerError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        self.split_with_rng(total, count, count, &mut rng)
    }

    /// Core split routine over an injected random source.
    ///
    /// Totals below the minimum fragmentable unit come back as a single
    /// fragment equal to the total. Zero is the one exception: it is
    /// rejected with [`MixerError::ZeroTotal`] because every fragment must be
    /// strictly positive, and a single zero fragment would not be.
    pub fn split_with_rng<R: Rng + ?Sized>(
        &self,
        total: Amount,
        min_count: usize,
        max_count: usize,
        rng: &mut R,
    ) -> Result<Vec<Amount>, MixerError> {
        if total.is_zero() {
            return Err(MixerError::ZeroTotal);
        }
        if min_count == 0 || min_count > max_count || max_count > MAX_FRAGMENTS {
            return Err(MixerError::InvalidFragmentCount {
                min: min_count,
                max: max_count,
                limit: MAX_FRAGMENTS,
            });
        }
        if total < self.min_fragmentable {
            tracing::debug!(%total, "below minimum fragmentable unit, not splitting");
            return Ok(vec![total]);
        }

        let count = if min_count == max_count {
            min_count
        } else {
            // u32 sampling keeps the stream identical on 32- and 64-bit targets.
            rng.gen_range(min_count as u32..=max_count as u32) as usize
        };
        if count == 1 {
            return Ok(vec![total]);
        }

        let weights: Vec<f64> = (0..count)
            .map(|_| {
                let u: f64 = rng.gen();
                u * u + WEIGHT_FLOOR
            })
            .collect();
        let weight_sum: f64 = weights.iter().sum();
        let total_units = total.units() as f64;

        let mut units: Vec<u64> = weights
            .iter()
            .map(|w| {
                let share = total_units * w / weight_sum;
                let noise = (rng.gen::<f64>() * 2.0 - 1.0) * NOISE_FRACTION;
                let noisy = (share * (1.0 + noise)).max(0.0);
                let truncated = ((noisy / UNITS_PER_CENT).floor() * UNITS_PER_CENT) as u64;
                let offset = NOISE_OFFSETS[rng.gen_range(0..NOISE_OFFSETS.len() as u32) as usize];
                truncated + offset
            })
            .collect();

        absorb_residual(&mut units, total.units());

        let fragments: Vec<Amount> = units.into_iter().map(Amount::from_units).collect();
        check_conservation(total, &fragments)?;

        tracing::debug!(%total, fragments = fragments.len(), "split total into fragments");
        Ok(fragments)
    }
}

/// Add `target - sum(units)` to the last fragment.
///
/// When the residual is negative and larger than the last fragment, the
/// deficit is taken from the largest fragments instead, never reducing any
/// fragment below one unit.
fn absorb_residual(units: &mut [u64], target: u64) {
    let sum: u128 = units.iter().map(|u| u128::from(*u)).sum();
    let target = u128::from(target);
    let Some(last) = units.len().checked_sub(1) else {
        return;
    };

    if sum <= target {
        units[last] += (target - sum) as u64;
        return;
    }

    let mut deficit = (sum - target) as u64;
    if units[last] > deficit {
        units[last] -= deficit;
        return;
    }

    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by(|a, b| units[*b].cmp(&units[*a]));
    for i in order {
        if deficit == 0 {
            break;
        }
        let spare = units[i].saturating_sub(1);
        let take = spare.min(deficit);
        units[i] -= take;
        deficit -= take;
    }
}

/// Verify exact conservation and strict positivity.
pub fn check_conservation(total: Amount, fragments: &[Amount]) -> Result<(), MixerError> {
    if let Some(index) = fragments.iter().position(|f| f.is_zero()) {
        return Err(MixerError::NonPositiveFragment { index });
    }
    let actual = Amount::checked_sum(fragments).ok_or(MixerError::ConservationViolation {
        expected: total,
        actual: Amount::from_units(u64::MAX),
    })?;
    if actual != total {
        return Err(MixerError::ConservationViolation {
            expected: total,
            actual,
        });
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// |sum(split(T)) - T| < 1e-4 for every T >= 0.1 (exact in units).
        #[test]
        fn split_conserves_total(units in 1_000u64..10_000_000_000u64) {
            let total = Amount::from_units(units);
            let parts = AmountSplitter::default().split(total).unwrap();
            prop_assert_eq!(Amount::checked_sum(&parts), Some(total));
            prop_assert!(parts.iter().all(|p| !p.is_zero()));
        }

        /// Pinned counts up to the limit still conserve.
        #[test]
        fn deterministic_split_conserves(
            units in 1_000u64..1_000_000_000u64,
            count in 1usize..=MAX_FRAGMENTS,
            seed in any::<u64>(),
        ) {
            let total = Amount::from_units(units);
            let s = AmountSplitter::default();
            let parts = s.split_deterministic(total, count, seed).unwrap();
            prop_assert_eq!(parts.len(), count);
            prop_assert_eq!(Amount::checked_sum(&parts), Some(total));
            prop_assert_eq!(parts, s.split_deterministic(total, count, seed).unwrap());
        }

        /// Totals under the floor are never fragmented.
        #[test]
        fn tiny_totals_stay_whole(units in 1u64..1_000u64) {
            let total = Amount::from_units(units);
            prop_assert_eq!(AmountSplitter::default().split(total).unwrap(), vec![total]);
        }
    }
}
