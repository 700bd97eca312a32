//! # Withdrawal Scheduler
//!
//! Assigns release timestamps to fragments so that their arrival times look
//! like independent events rather than a burst from one source.
//!
//! ```text
//! cursor_0 = 0
//! cursor_i = cursor_{i-1} + (-avg_delay * ln(1 - U_i))     U_i ~ Uniform[0, 1)
//! t_i      = now + min_aging + cursor_i + J_i               J_i ~ Uniform[-jitter, +jitter]
//! ```
//!
//! Each fragment's target address is derived from the seed at a
//! monotonically increasing index.
//!
//! Jitter can swap neighbouring release times. The output is deliberately
//! left in fragment order and is never sorted by time.
//!
//! ## Lifecycle
//!
//! ```text
//! PENDING --(scheduled_time <= now)--> READY --(network confirms)--> EXECUTED
//! ```
//!
//! No transition moves backward.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use veil_core::{Amount, StateError, WithdrawalId};
use veil_crypto::{AddressDeriver, MixingSeed};

use crate::config::MixerConfig;
use crate::error::MixerError;

/// Release state of a scheduled withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Waiting for its release time.
    Pending,
    /// Release time reached; may be submitted to the transfer network.
    Ready,
    /// Delivered by the transfer network (terminal).
    Executed,
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Ready => "READY",
            Self::Executed => "EXECUTED",
        };
        f.write_str(s)
    }
}

/// One fragment with its target address and release time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledWithdrawal {
    /// Unique withdrawal identifier.
    pub id: WithdrawalId,
    /// Fragment amount.
    pub amount: Amount,
    /// Derived address receiving this fragment.
    pub target_address: String,
    /// Derivation index of `target_address`.
    pub address_index: u32,
    /// Earliest release time.
    pub scheduled_time: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: WithdrawalStatus,
}

impl ScheduledWithdrawal {
    /// Promote PENDING to READY once `scheduled_time <= now`.
    ///
    /// Returns `true` if the status changed. READY and EXECUTED withdrawals
    /// are left untouched.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == WithdrawalStatus::Pending && self.scheduled_time <= now {
            self.status = WithdrawalStatus::Ready;
            return true;
        }
        false
    }

    /// Whether the withdrawal may be submitted now.
    pub fn is_ready(&self) -> bool {
        self.status == WithdrawalStatus::Ready
    }

    /// Record network confirmation. Only READY withdrawals can execute.
    pub fn mark_executed(&mut self) -> Result<(), StateError> {
        match self.status {
            WithdrawalStatus::Ready => {
                self.status = WithdrawalStatus::Executed;
                Ok(())
            }
            other => Err(StateError::InvalidTransition {
                from: other.to_string(),
                to: WithdrawalStatus::Executed.to_string(),
                reason: match other {
                    WithdrawalStatus::Pending => "release time not reached".into(),
                    _ => "withdrawal already executed".into(),
                },
            }),
        }
    }
}

/// Assigns Poisson-like release times and derived target addresses.
#[derive(Debug, Clone)]
pub struct WithdrawalScheduler {
    min_aging_hours: u64,
    avg_delay_secs: f64,
    jitter_secs: f64,
    deriver: AddressDeriver,
}

impl Default for WithdrawalScheduler {
    fn default() -> Self {
        Self::new(&MixerConfig::default())
    }
}

impl WithdrawalScheduler {
    /// Create a scheduler from configuration.
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            min_aging_hours: config.min_aging_hours,
            avg_delay_secs: config.avg_delay_secs(),
            jitter_secs: config.jitter_secs(),
            deriver: AddressDeriver,
        }
    }

    /// Minimum aging applied before the first release, in hours.
    pub fn min_aging_hours(&self) -> u64 {
        self.min_aging_hours
    }

    /// Schedule fragments with the thread RNG.
    pub fn schedule(
        &self,
        fragments: &[Amount],
        seed: &MixingSeed,
        start_index: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledWithdrawal>, MixerError> {
        self.schedule_with_rng(fragments, seed, start_index, now, &mut rand::thread_rng())
    }

    /// Schedule fragments over an injected random source.
    pub fn schedule_with_rng<R: Rng + ?Sized>(
        &self,
        fragments: &[Amount],
        seed: &MixingSeed,
        start_index: u32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<ScheduledWithdrawal>, MixerError> {
        let exhausted = || MixerError::IndexExhausted {
            start: start_index,
            count: fragments.len(),
        };
        let count = u32::try_from(fragments.len()).map_err(|_| exhausted())?;
        if count > 0 {
            start_index.checked_add(count - 1).ok_or_else(exhausted)?;
        }

        let base = i64::try_from(self.min_aging_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .and_then(|aging| now.checked_add_signed(aging))
            .ok_or(MixerError::TimeOverflow("minimum aging"))?;
        let mut cursor_secs = 0.0f64;
        let mut scheduled = Vec::with_capacity(fragments.len());

        for (offset, amount) in (0u32..).zip(fragments) {
            cursor_secs += self.draw_delay_secs(rng);
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * self.jitter_secs;
            // `as` saturates, so a runaway cursor lands on a checked bound.
            let offset_ms = ((cursor_secs + jitter) * 1000.0) as i64;
            let at = TimeDelta::try_milliseconds(offset_ms)
                .and_then(|delta| base.checked_add_signed(delta))
                .ok_or(MixerError::TimeOverflow("inter-arrival delay"))?;

            let index = start_index + offset;
            let address = self.deriver.derive_address(seed, index);

            scheduled.push(ScheduledWithdrawal {
                id: WithdrawalId::new(),
                amount: *amount,
                target_address: address.public_address,
                address_index: index,
                scheduled_time: at,
                status: WithdrawalStatus::Pending,
            });
        }

        tracing::debug!(
            fragments = scheduled.len(),
            start_index,
            earliest_release = %base,
            "scheduled withdrawals"
        );
        Ok(scheduled)
    }

    /// Exponential inter-arrival delay with mean `avg_delay`.
    fn draw_delay_secs<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        -self.avg_delay_secs * (1.0 - u).ln()
    }
}
