//! # veil-mixer: Private-Transfer Fragmentation
//!
//! Turns one withdrawal of amount `A` into a set of unlinkable releases:
//!
//! ```text
//! AmountSplitter      A  ->  [a1, a2, .., aN]          sum(ai) == A exactly
//! AddressDeriver      (seed, i) -> addr_i              fresh address per fragment
//! WithdrawalScheduler [ai] -> [(ai, addr_i, t_i)]       now + aging + Exp(avg) + jitter
//! PrivacyScorer       plan -> 0..=100
//! ```
//!
//! [`WithdrawalPlanner`] runs the whole pipeline. [`network::release_ready`]
//! hands due withdrawals to an external [`TransferNetwork`].
//!
//! ## Randomness
//!
//! Every randomized step is generic over `rand::Rng`. The default entry
//! points use the thread RNG; the deterministic entry points seed a
//! `ChaCha20Rng`, whose output stream is identical on every platform.

pub mod config;
pub mod error;
pub mod network;
pub mod planner;
pub mod scheduler;
pub mod scorer;
pub mod splitter;

pub use config::MixerConfig;
pub use error::{MixerError, NetworkError};
pub use network::{release_ready, ReleaseReport, TransferNetwork, TransferReceipt};
pub use planner::{Fragment, PlanRequest, WithdrawalPlan, WithdrawalPlanner};
pub use scheduler::{ScheduledWithdrawal, WithdrawalScheduler, WithdrawalStatus};
pub use scorer::{PrivacyInputs, PrivacyScorer};
pub use splitter::AmountSplitter;
