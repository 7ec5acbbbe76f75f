// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Dispatcher
//!
//! Submits the three demo transactions and re-fetches the balances each one
//! affects.
//!
//! ## Refresh table
//!
//! | Operation | Contract call | Re-fetched |
//! |-----------|---------------|------------|
//! | `mint` | `SampleToken.mint(account, 1 ether)` | sample token |
//! | `unwrap` | `WrappedEther.withdraw(0.1 ether)` | native, wrapped ether |
//! | `wrap` | `WrappedEther.deposit{value: 0.1 ether}()` | sample token |
//!
//! The `wrap` row re-fetches the sample token, not wrapped ether. That is the
//! established behavior and is covered by a regression test.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::blockchain::{contracts, parse_ether, AmountError, BalanceField};
use crate::gateway::{ContractCall, ContractGateway, GatewayError};
use crate::notices::{Notice, NoticeBoard};
use crate::sync::{BalanceSynchronizer, FetchResult};
use crate::wallet::SessionContext;

/// Sample tokens minted per `mint`.
pub const MINT_AMOUNT: &str = "1";

/// Native currency moved per `wrap` / `unwrap`.
pub const WRAP_AMOUNT: &str = "0.1";

/// State-changing operations offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Mint,
    Unwrap,
    Wrap,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Mint, Operation::Unwrap, Operation::Wrap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Mint => "mint",
            Operation::Unwrap => "unwrap",
            Operation::Wrap => "wrap",
        }
    }

    /// Balances re-fetched once the node accepts the transaction.
    pub const fn refreshes(&self) -> &'static [BalanceField] {
        match self {
            Operation::Mint => &[BalanceField::SampleToken],
            Operation::Unwrap => &[BalanceField::Native, BalanceField::WrappedEther],
            Operation::Wrap => &[BalanceField::SampleToken],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from submitting a transaction.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{operation} failed: {source}")]
    Gateway {
        operation: Operation,
        source: GatewayError,
    },

    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// A transaction the node accepted.
#[derive(Debug, Clone)]
pub struct Submission {
    pub operation: Operation,
    pub tx_hash: TxHash,
    pub explorer_url: String,
    /// Notice text shown to the user
    pub message: String,
}

/// Accepted transaction plus the refreshes that followed it.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub operation: Operation,
    pub tx_hash: TxHash,
    pub explorer_url: String,
    pub refreshed: Vec<(BalanceField, FetchResult)>,
}

/// Result of a dispatch that did not fail.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// No connected session; nothing was submitted.
    Skipped,
    Submitted(DispatchReceipt),
}

/// Submits mint / wrap / unwrap for the active account.
pub struct TransactionDispatcher {
    gateway: Arc<dyn ContractGateway>,
    synchronizer: Arc<BalanceSynchronizer>,
    notices: Arc<NoticeBoard>,
}

impl TransactionDispatcher {
    pub fn new(
        gateway: Arc<dyn ContractGateway>,
        synchronizer: Arc<BalanceSynchronizer>,
        notices: Arc<NoticeBoard>,
    ) -> Self {
        Self {
            gateway,
            synchronizer,
            notices,
        }
    }

    pub async fn mint(&self, ctx: &SessionContext) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch(ctx, Operation::Mint).await
    }

    pub async fn unwrap(&self, ctx: &SessionContext) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch(ctx, Operation::Unwrap).await
    }

    pub async fn wrap(&self, ctx: &SessionContext) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch(ctx, Operation::Wrap).await
    }

    /// Submit `operation`, record a notice, then run its refreshes in table
    /// order.
    ///
    /// A failed submission returns an error before any notice or refresh.
    /// A failed refresh is reported in the receipt only.
    pub async fn dispatch(
        &self,
        ctx: &SessionContext,
        operation: Operation,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(submission) = self.submit(ctx, operation).await? else {
            return Ok(DispatchOutcome::Skipped);
        };
        let refreshed = self.refresh_after(ctx, operation).await;

        Ok(DispatchOutcome::Submitted(DispatchReceipt {
            operation,
            tx_hash: submission.tx_hash,
            explorer_url: submission.explorer_url,
            refreshed,
        }))
    }

    /// Submit `operation` and record its notice, without refreshing.
    ///
    /// Returns `None` when no session is connected.
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        operation: Operation,
    ) -> Result<Option<Submission>, DispatchError> {
        let Some(account) = ctx.active_account() else {
            debug!(%operation, "No connected session, skipping transaction");
            return Ok(None);
        };

        let call = self.build_call(operation, account)?;
        let tx_hash = self.gateway.write(call).await.map_err(|source| {
            warn!(%operation, account = %account, error = %source, "Transaction submission failed");
            DispatchError::Gateway { operation, source }
        })?;

        let notice = Notice {
            operation,
            tx_hash: tx_hash.to_string(),
            explorer_url: ctx.network.tx_url(&tx_hash.to_string()),
            submitted_at: Utc::now(),
        };
        info!(
            %operation,
            account = %account,
            explorer_url = %notice.explorer_url,
            "{}",
            notice.message()
        );
        let submission = Submission {
            operation,
            tx_hash,
            explorer_url: notice.explorer_url.clone(),
            message: notice.message(),
        };
        self.notices.push(notice);

        Ok(Some(submission))
    }

    /// Re-fetch the balances `operation` affects, in table order.
    pub async fn refresh_after(
        &self,
        ctx: &SessionContext,
        operation: Operation,
    ) -> Vec<(BalanceField, FetchResult)> {
        let mut refreshed = Vec::with_capacity(operation.refreshes().len());
        for &field in operation.refreshes() {
            refreshed.push((field, self.synchronizer.fetch_field(ctx, field).await));
        }
        refreshed
    }

    fn build_call(&self, operation: Operation, account: Address) -> Result<ContractCall, DispatchError> {
        let set = self.synchronizer.contracts();
        let call = match operation {
            Operation::Mint => contracts::mint(set.sample_token, account, parse_ether(MINT_AMOUNT)?),
            Operation::Unwrap => contracts::withdraw(set.wrapped_ether, parse_ether(WRAP_AMOUNT)?),
            Operation::Wrap => contracts::deposit(set.wrapped_ether, parse_ether(WRAP_AMOUNT)?),
        };
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use alloy::sol_types::SolCall;

    use super::*;
    use crate::blockchain::contracts::{ISampleToken, IWrappedEther};
    use crate::blockchain::{BalanceSet, SEPOLIA};
    use crate::sync::FetchOutcome;
    use crate::testing::{account, contract_set, tx_hash, GatewayCall, MockGateway, ONE_ETHER};

    struct Harness {
        gateway: Arc<MockGateway>,
        synchronizer: Arc<BalanceSynchronizer>,
        notices: Arc<NoticeBoard>,
        dispatcher: TransactionDispatcher,
    }

    fn harness() -> Harness {
        let gateway = Arc::new(MockGateway::new());
        let synchronizer = Arc::new(BalanceSynchronizer::new(gateway.clone(), contract_set()));
        let notices = Arc::new(NoticeBoard::new());
        let dispatcher =
            TransactionDispatcher::new(gateway.clone(), synchronizer.clone(), notices.clone());
        Harness {
            gateway,
            synchronizer,
            notices,
            dispatcher,
        }
    }

    fn connected() -> SessionContext {
        SessionContext::connected(account(), SEPOLIA)
    }

    fn submitted(outcome: DispatchOutcome) -> DispatchReceipt {
        match outcome {
            DispatchOutcome::Submitted(receipt) => receipt,
            DispatchOutcome::Skipped => panic!("expected a submitted transaction"),
        }
    }

    fn one_tenth() -> U256 {
        ONE_ETHER / U256::from(10u64)
    }

    #[test]
    fn refresh_table() {
        assert_eq!(Operation::Mint.refreshes(), &[BalanceField::SampleToken]);
        assert_eq!(
            Operation::Unwrap.refreshes(),
            &[BalanceField::Native, BalanceField::WrappedEther]
        );
        assert_eq!(Operation::Wrap.refreshes(), &[BalanceField::SampleToken]);
    }

    #[tokio::test]
    async fn mint_refreshes_only_the_sample_token() {
        let h = harness();
        let contracts = contract_set();
        h.gateway.push_write(Ok(tx_hash(0x11)));
        h.gateway.push_token_balance(contracts.sample_token, ONE_ETHER);

        let receipt = submitted(h.dispatcher.mint(&connected()).await.unwrap());

        assert_eq!(receipt.tx_hash, tx_hash(0x11));
        assert_eq!(
            h.gateway.calls(),
            vec![
                GatewayCall::Write {
                    to: contracts.sample_token,
                    selector: Some(ISampleToken::mintCall::SELECTOR.into()),
                    value: U256::ZERO,
                },
                GatewayCall::BalanceOf(contracts.sample_token),
            ]
        );
        assert_eq!(h.synchronizer.balances().sample_token, "1.0");
        assert_eq!(
            receipt.refreshed[0].1.as_ref().unwrap(),
            &FetchOutcome::Updated("1.0".to_string())
        );
    }

    #[tokio::test]
    async fn mint_records_a_notice_with_the_hash() {
        let h = harness();
        h.gateway.push_write(Ok(tx_hash(0x22)));
        h.gateway.push_token_balance(contract_set().sample_token, ONE_ETHER);

        let receipt = submitted(h.dispatcher.mint(&connected()).await.unwrap());

        let notice = h.notices.latest().unwrap();
        assert_eq!(notice.operation, Operation::Mint);
        assert_eq!(notice.tx_hash, receipt.tx_hash.to_string());
        assert_eq!(
            notice.explorer_url,
            format!("https://sepolia.etherscan.io/tx/{}", receipt.tx_hash)
        );
        assert_eq!(receipt.explorer_url, notice.explorer_url);
    }

    #[tokio::test]
    async fn unwrap_refreshes_native_and_wrapped_ether() {
        let h = harness();
        let contracts = contract_set();
        h.gateway.push_write(Ok(tx_hash(0x33)));
        h.gateway.push_native_balance(ONE_ETHER);
        h.gateway.push_token_balance(contracts.wrapped_ether, one_tenth());

        submitted(h.dispatcher.unwrap(&connected()).await.unwrap());

        assert_eq!(
            h.gateway.calls(),
            vec![
                GatewayCall::Write {
                    to: contracts.wrapped_ether,
                    selector: Some(IWrappedEther::withdrawCall::SELECTOR.into()),
                    value: U256::ZERO,
                },
                GatewayCall::NativeBalance(account()),
                GatewayCall::BalanceOf(contracts.wrapped_ether),
            ]
        );
        let balances = h.synchronizer.balances();
        assert_eq!(balances.native, "1.0");
        assert_eq!(balances.wrapped_ether, "0.1");
    }

    #[tokio::test]
    async fn wrap_sends_value_and_refreshes_the_sample_token() {
        let h = harness();
        let contracts = contract_set();
        h.gateway.push_write(Ok(tx_hash(0x44)));
        h.gateway.push_token_balance(contracts.sample_token, ONE_ETHER);

        let receipt = submitted(h.dispatcher.wrap(&connected()).await.unwrap());

        assert_eq!(
            h.gateway.calls()[0],
            GatewayCall::Write {
                to: contracts.wrapped_ether,
                selector: Some(IWrappedEther::depositCall::SELECTOR.into()),
                value: one_tenth(),
            }
        );
        // Exactly one refresh, of the sample token rather than wrapped ether.
        assert_eq!(
            h.gateway.balance_reads(),
            vec![GatewayCall::BalanceOf(contracts.sample_token)]
        );
        assert_eq!(receipt.refreshed.len(), 1);
        assert_eq!(receipt.refreshed[0].0, BalanceField::SampleToken);
    }

    #[tokio::test]
    async fn rejected_write_leaves_balances_and_notices_untouched() {
        let h = harness();
        let contracts = contract_set();
        h.gateway.push_token_balance(contracts.sample_token, ONE_ETHER);
        h.synchronizer.fetch_sample_token(&connected()).await.unwrap();
        let before = h.synchronizer.balances();
        h.gateway.clear_calls();

        h.gateway
            .push_write(Err(GatewayError::Rejected("user denied signature".into())));
        let err = h.dispatcher.mint(&connected()).await.unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Gateway {
                operation: Operation::Mint,
                source: GatewayError::Rejected(_),
            }
        ));
        assert_eq!(h.synchronizer.balances(), before);
        assert!(h.notices.is_empty());
        assert!(h.gateway.balance_reads().is_empty());
    }

    #[tokio::test]
    async fn disconnected_dispatch_is_skipped() {
        let h = harness();
        let ctx = SessionContext::disconnected(SEPOLIA);

        for operation in Operation::ALL {
            let outcome = h.dispatcher.dispatch(&ctx, operation).await.unwrap();
            assert!(matches!(outcome, DispatchOutcome::Skipped));
        }
        assert!(h.gateway.calls().is_empty());
        assert!(h.notices.is_empty());
        assert_eq!(h.synchronizer.balances(), BalanceSet::default());
    }

    #[tokio::test]
    async fn submit_records_the_notice_before_any_refresh() {
        let h = harness();
        h.gateway.push_write(Ok(tx_hash(0x66)));

        let submission = h
            .dispatcher
            .submit(&connected(), Operation::Mint)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            submission.message,
            format!("transaction sent with tx hash: {}", tx_hash(0x66))
        );
        assert_eq!(h.notices.latest().unwrap().tx_hash, tx_hash(0x66).to_string());
        assert!(h.gateway.balance_reads().is_empty());

        h.gateway
            .push_token_balance(contract_set().sample_token, ONE_ETHER);
        let refreshed = h.dispatcher.refresh_after(&connected(), Operation::Mint).await;
        assert_eq!(refreshed.len(), 1);
        assert_eq!(h.synchronizer.balances().sample_token, "1.0");
    }

    #[tokio::test]
    async fn failed_refresh_does_not_fail_the_submission() {
        let h = harness();
        h.gateway.push_write(Ok(tx_hash(0x55)));
        h.gateway.push_native_error(GatewayError::Rpc("timeout".into()));
        h.gateway
            .push_token_balance(contract_set().wrapped_ether, one_tenth());

        let receipt = submitted(h.dispatcher.unwrap(&connected()).await.unwrap());

        assert!(receipt.refreshed[0].1.is_err());
        assert!(receipt.refreshed[1].1.is_ok());
        assert!(h.notices.latest().is_some());
        assert_eq!(h.synchronizer.balances().native, "0");
    }
}
