//! # Withdrawal Planner
//!
//! Runs the full private-withdrawal pipeline for one request:
//! split → derive + schedule → score.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use veil_core::Amount;
use veil_crypto::MixingSeed;

use crate::config::MixerConfig;
use crate::error::MixerError;
use crate::scheduler::{ScheduledWithdrawal, WithdrawalScheduler};
use crate::scorer::{PrivacyInputs, PrivacyScorer};
use crate::splitter::AmountSplitter;

/// One sub-amount routed to a derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Fragment amount.
    pub amount: Amount,
    /// Derived target address.
    pub target_address: String,
}

/// A private withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRequest {
    /// Total to withdraw.
    pub total: Amount,
    /// First derivation index to use under the caller's seed.
    pub start_index: u32,
    /// Current size of the anonymity pool.
    pub pool_size: u64,
}

/// Result of planning a private withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalPlan {
    /// Requested total.
    pub total: Amount,
    /// Fragments in split order.
    pub fragments: Vec<Fragment>,
    /// Release schedule, one entry per fragment, in fragment order.
    pub schedule: Vec<ScheduledWithdrawal>,
    /// Composite privacy score, 0..=100.
    pub privacy_score: u8,
}

impl WithdrawalPlan {
    /// Next unused derivation index after this plan.
    pub fn next_index(&self) -> Option<u32> {
        self.schedule
            .last()
            .and_then(|w| w.address_index.checked_add(1))
    }
}

/// Orchestrates splitter, scheduler, and scorer.
#[derive(Debug, Clone)]
pub struct WithdrawalPlanner {
    splitter: AmountSplitter,
    scheduler: WithdrawalScheduler,
    scorer: PrivacyScorer,
}

impl Default for WithdrawalPlanner {
    fn default() -> Self {
        Self::new(&MixerConfig::default())
    }
}

impl WithdrawalPlanner {
    /// Create a planner from configuration.
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            splitter: AmountSplitter::new(config),
            scheduler: WithdrawalScheduler::new(config),
            scorer: PrivacyScorer,
        }
    }

    /// Plan with the thread RNG.
    pub fn plan(
        &self,
        request: PlanRequest,
        seed: &MixingSeed,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalPlan, MixerError> {
        self.plan_with_rng(request, seed, now, &mut rand::thread_rng())
    }

    /// Reproducible plan: same request, seed, `rng_seed` and `now` give the
    /// same fragments, addresses, and release times.
    pub fn plan_deterministic(
        &self,
        request: PlanRequest,
        seed: &MixingSeed,
        now: DateTime<Utc>,
        rng_seed: u64,
    ) -> Result<WithdrawalPlan, MixerError> {
        self.plan_with_rng(request, seed, now, &mut ChaCha20Rng::seed_from_u64(rng_seed))
    }

    /// Plan over an injected random source.
    pub fn plan_with_rng<R: Rng + ?Sized>(
        &self,
        request: PlanRequest,
        seed: &MixingSeed,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<WithdrawalPlan, MixerError> {
        let (min, max) = AmountSplitter::count_band(request.total);
        let amounts = self.splitter.split_with_rng(request.total, min, max, rng)?;
        let schedule =
            self.scheduler
                .schedule_with_rng(&amounts, seed, request.start_index, now, rng)?;

        let fragments: Vec<Fragment> = schedule
            .iter()
            .map(|w| Fragment {
                amount: w.amount,
                target_address: w.target_address.clone(),
            })
            .collect();

        let unique: HashSet<&str> = fragments.iter().map(|f| f.target_address.as_str()).collect();
        let inputs = PrivacyInputs {
            split_count: fragments.len() as u32,
            unique_addresses: unique.len() as u32,
            min_aging_hours: self.scheduler.min_aging_hours() as f64,
            pool_size: request.pool_size,
        };
        let privacy_score = self.scorer.score(&inputs);

        tracing::info!(
            total = %request.total,
            fragments = fragments.len(),
            privacy_score,
            "planned private withdrawal"
        );

        Ok(WithdrawalPlan {
            total: request.total,
            fragments,
            schedule,
            privacy_score,
        })
    }
}
