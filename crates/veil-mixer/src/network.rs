//! # Transfer Network Seam
//!
//! The confidential-transfer network (deposits into the pool, withdrawals
//! out of it, transfers between wallets) lives outside this crate. The
//! engine only needs the narrow surface in [`TransferNetwork`].
//!
//! [`release_ready`] walks a schedule, promotes due withdrawals, and submits
//! them in schedule order. It stops at the first network failure. Withdrawals
//! already confirmed stay EXECUTED; there is no rollback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veil_core::{Amount, WithdrawalId};

use crate::error::{MixerError, NetworkError};
use crate::scheduler::{ScheduledWithdrawal, WithdrawalStatus};

/// Confirmation returned by the network for a submitted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Network-side transaction reference.
    pub tx_ref: String,
    /// Amount moved.
    pub amount: Amount,
}

/// Operations the engine needs from the transfer network.
#[async_trait]
pub trait TransferNetwork: Send + Sync {
    /// Move `amount` of `token` from `wallet` into the private pool.
    async fn deposit(
        &self,
        wallet: &str,
        amount: Amount,
        token: &str,
    ) -> Result<TransferReceipt, NetworkError>;

    /// Move `amount` of `token` out of the private pool back to `wallet`.
    async fn withdraw(
        &self,
        wallet: &str,
        amount: Amount,
        token: &str,
    ) -> Result<TransferReceipt, NetworkError>;

    /// Confidential transfer between two wallets.
    async fn transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: Amount,
        token: &str,
    ) -> Result<TransferReceipt, NetworkError>;

    /// Private balance of `wallet` in `token`.
    async fn balance(&self, wallet: &str, token: &str) -> Result<Amount, NetworkError>;
}

/// Outcome of one [`release_ready`] pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Withdrawals confirmed during this pass, with their receipts.
    pub executed: Vec<(WithdrawalId, TransferReceipt)>,
    /// Withdrawals still waiting for their release time.
    pub pending: usize,
}

/// Submit every due withdrawal in `schedule` to `network`.
///
/// Each withdrawal is refreshed against `now` first. READY withdrawals are
/// transferred from `sender` to their target address in schedule order and
/// marked EXECUTED once confirmed. The first network error aborts the pass
/// and is returned; the offending withdrawal stays READY.
pub async fn release_ready<N>(
    schedule: &mut [ScheduledWithdrawal],
    sender: &str,
    token: &str,
    network: &N,
    now: DateTime<Utc>,
) -> Result<ReleaseReport, MixerError>
where
    N: TransferNetwork + ?Sized,
{
    let mut report = ReleaseReport::default();

    for withdrawal in schedule.iter_mut() {
        withdrawal.refresh(now);
        if !withdrawal.is_ready() {
            if withdrawal.status == WithdrawalStatus::Pending {
                report.pending += 1;
            }
            continue;
        }

        let receipt = match network
            .transfer(sender, &withdrawal.target_address, withdrawal.amount, token)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(
                    withdrawal = %withdrawal.id,
                    error = %e,
                    executed = report.executed.len(),
                    "release aborted on network error"
                );
                return Err(e.into());
            }
        };

        withdrawal.mark_executed()?;
        tracing::info!(
            withdrawal = %withdrawal.id,
            amount = %withdrawal.amount,
            tx_ref = %receipt.tx_ref,
            "withdrawal released"
        );
        report.executed.push((withdrawal.id, receipt));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::WithdrawalScheduler;
    use chrono::Duration;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use veil_crypto::MixingSeed;

    /// In-memory network with a per-wallet balance book.
    #[derive(Default)]
    struct MockNetwork {
        balances: Mutex<HashMap<String, Amount>>,
        fail_after: Option<usize>,
        transfers: Mutex<Vec<(String, Amount)>>,
    }

    impl MockNetwork {
        fn funded(wallet: &str, amount: Amount) -> Self {
            let net = Self::default();
            net.balances.lock().insert(wallet.to_string(), amount);
            net
        }

        fn debit(&self, wallet: &str, amount: Amount) -> Result<(), NetworkError> {
            let mut book = self.balances.lock();
            let available = book.get(wallet).copied().unwrap_or(Amount::ZERO);
            let rest = available
                .checked_sub(amount)
                .ok_or(NetworkError::InsufficientBalance {
                    needed: amount,
                    available,
                })?;
            book.insert(wallet.to_string(), rest);
            Ok(())
        }

        fn credit(&self, wallet: &str, amount: Amount) {
            let mut book = self.balances.lock();
            let entry = book.entry(wallet.to_string()).or_insert(Amount::ZERO);
            *entry = entry.checked_add(amount).unwrap();
        }
    }

    #[async_trait]
    impl TransferNetwork for MockNetwork {
        async fn deposit(
            &self,
            wallet: &str,
            amount: Amount,
            _token: &str,
        ) -> Result<TransferReceipt, NetworkError> {
            self.credit(wallet, amount);
            Ok(TransferReceipt { tx_ref: "dep".into(), amount })
        }

        async fn withdraw(
            &self,
            wallet: &str,
            amount: Amount,
            _token: &str,
        ) -> Result<TransferReceipt, NetworkError> {
            self.debit(wallet, amount)?;
            Ok(TransferReceipt { tx_ref: "wd".into(), amount })
        }

        async fn transfer(
            &self,
            sender: &str,
            recipient: &str,
            amount: Amount,
            _token: &str,
        ) -> Result<TransferReceipt, NetworkError> {
            let mut log = self.transfers.lock();
            if self.fail_after.is_some_and(|n| log.len() >= n) {
                return Err(NetworkError::Unavailable("rpc timeout".into()));
            }
            self.debit(sender, amount)?;
            self.credit(recipient, amount);
            log.push((recipient.to_string(), amount));
            Ok(TransferReceipt {
                tx_ref: format!("tx{}", log.len()),
                amount,
            })
        }

        async fn balance(&self, wallet: &str, _token: &str) -> Result<Amount, NetworkError> {
            Ok(self.balances.lock().get(wallet).copied().unwrap_or(Amount::ZERO))
        }
    }

    fn schedule(n: u64, now: DateTime<Utc>) -> Vec<ScheduledWithdrawal> {
        let amounts: Vec<Amount> = (1..=n).map(|i| Amount::from_units(i * 10_003)).collect();
        WithdrawalScheduler::default()
            .schedule(&amounts, &MixingSeed::from_bytes([3u8; 32]), 0, now)
            .unwrap()
    }

    #[tokio::test]
    async fn nothing_released_before_aging() {
        let now = Utc::now();
        let mut sched = schedule(3, now);
        let net = MockNetwork::funded("payer", Amount::from_units(1_000_000));

        let report = release_ready(&mut sched, "payer", "USDC", &net, now).await.unwrap();
        assert!(report.executed.is_empty());
        assert_eq!(report.pending, 3);
        assert!(net.transfers.lock().is_empty());
    }

    #[tokio::test]
    async fn due_withdrawals_are_transferred_and_executed() {
        let now = Utc::now();
        let mut sched = schedule(3, now);
        let net = MockNetwork::funded("payer", Amount::from_units(1_000_000));
        let later = now + Duration::days(30);

        let report = release_ready(&mut sched, "payer", "USDC", &net, later).await.unwrap();
        assert_eq!(report.executed.len(), 3);
        assert_eq!(report.pending, 0);
        assert!(sched.iter().all(|w| w.status == WithdrawalStatus::Executed));

        for w in &sched {
            let got = net.balance(&w.target_address, "USDC").await.unwrap();
            assert_eq!(got, w.amount);
        }

        // A second pass is a no-op.
        let again = release_ready(&mut sched, "payer", "USDC", &net, later).await.unwrap();
        assert!(again.executed.is_empty());
        assert_eq!(net.transfers.lock().len(), 3);
    }

    #[tokio::test]
    async fn stops_at_first_network_error_without_rollback() {
        let now = Utc::now();
        let mut sched = schedule(4, now);
        let net = MockNetwork {
            fail_after: Some(2),
            ..MockNetwork::funded("payer", Amount::from_units(1_000_000))
        };

        let err = release_ready(&mut sched, "payer", "USDC", &net, now + Duration::days(30))
            .await
            .unwrap_err();
        assert!(matches!(err, MixerError::Network(NetworkError::Unavailable(_))));

        let statuses: Vec<_> = sched.iter().map(|w| w.status).collect();
        assert_eq!(
            statuses,
            vec![
                WithdrawalStatus::Executed,
                WithdrawalStatus::Executed,
                WithdrawalStatus::Ready,
                WithdrawalStatus::Ready,
            ]
        );
    }

    #[tokio::test]
    async fn insufficient_balance_surfaces() {
        let now = Utc::now();
        let mut sched = schedule(2, now);
        let net = MockNetwork::funded("payer", Amount::from_units(5));

        let err = release_ready(&mut sched, "payer", "USDC", &net, now + Duration::days(30))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MixerError::Network(NetworkError::InsufficientBalance { .. })
        ));
        assert_eq!(sched[0].status, WithdrawalStatus::Ready);
    }

    #[tokio::test]
    async fn deposit_then_withdraw_round_trips_balance() {
        let net = MockNetwork::default();
        net.deposit("alice", Amount::from_units(50_000), "USDC").await.unwrap();
        net.withdraw("alice", Amount::from_units(20_000), "USDC").await.unwrap();
        assert_eq!(
            net.balance("alice", "USDC").await.unwrap(),
            Amount::from_units(30_000)
        );
        assert!(net.withdraw("alice", Amount::from_units(40_000), "USDC").await.is_err());
    }
}
