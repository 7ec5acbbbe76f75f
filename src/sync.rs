// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Synchronizer
//!
//! Reads the three displayed balances for the active account and stores them
//! as decimal strings in a [`BalanceSet`] published on a `watch` channel.
//!
//! Each field is fetched and stored on its own. There is no snapshot across
//! fields and no sequencing between overlapping fetches of the same field:
//! whichever read resolves last is what the display shows.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::blockchain::{contracts, format_units, BalanceField, BalanceSet, ContractSet};
use crate::gateway::{ContractGateway, GatewayError};
use crate::wallet::SessionContext;

/// Result of a single fetch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No connected session; display state untouched.
    Skipped,
    /// The field now holds this formatted value.
    Updated(String),
}

/// Errors from a balance read.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to read {field} balance: {source}")]
    Gateway {
        field: BalanceField,
        source: GatewayError,
    },

    #[error("Malformed {field} balance: {message}")]
    Decode {
        field: BalanceField,
        message: String,
    },
}

impl SyncError {
    pub fn field(&self) -> BalanceField {
        match self {
            SyncError::Gateway { field, .. } | SyncError::Decode { field, .. } => *field,
        }
    }
}

pub type FetchResult = Result<FetchOutcome, SyncError>;

/// Per-field results of [`BalanceSynchronizer::fetch_all`].
#[derive(Debug, Clone)]
pub struct FetchAllReport {
    pub native: FetchResult,
    pub sample_token: FetchResult,
    pub wrapped_ether: FetchResult,
}

impl FetchAllReport {
    fn skipped() -> Self {
        Self {
            native: Ok(FetchOutcome::Skipped),
            sample_token: Ok(FetchOutcome::Skipped),
            wrapped_ether: Ok(FetchOutcome::Skipped),
        }
    }

    pub fn results(&self) -> [(BalanceField, &FetchResult); 3] {
        [
            (BalanceField::Native, &self.native),
            (BalanceField::SampleToken, &self.sample_token),
            (BalanceField::WrappedEther, &self.wrapped_ether),
        ]
    }

    pub fn errors(&self) -> Vec<&SyncError> {
        self.results()
            .into_iter()
            .filter_map(|(_, result)| result.as_ref().err())
            .collect()
    }

    pub fn is_skipped(&self) -> bool {
        self.results()
            .iter()
            .all(|(_, result)| matches!(result, Ok(FetchOutcome::Skipped)))
    }
}

/// Keeps the displayed balances in step with the chain.
pub struct BalanceSynchronizer {
    gateway: Arc<dyn ContractGateway>,
    contracts: ContractSet,
    balances: watch::Sender<BalanceSet>,
}

impl BalanceSynchronizer {
    pub fn new(gateway: Arc<dyn ContractGateway>, contracts: ContractSet) -> Self {
        Self {
            gateway,
            contracts,
            balances: watch::Sender::new(BalanceSet::default()),
        }
    }

    pub fn contracts(&self) -> &ContractSet {
        &self.contracts
    }

    /// Current displayed balances.
    pub fn balances(&self) -> BalanceSet {
        self.balances.borrow().clone()
    }

    /// Subscribe to display updates.
    pub fn subscribe(&self) -> watch::Receiver<BalanceSet> {
        self.balances.subscribe()
    }

    pub async fn fetch_native(&self, ctx: &SessionContext) -> FetchResult {
        self.fetch_field(ctx, BalanceField::Native).await
    }

    pub async fn fetch_sample_token(&self, ctx: &SessionContext) -> FetchResult {
        self.fetch_field(ctx, BalanceField::SampleToken).await
    }

    pub async fn fetch_wrapped_ether(&self, ctx: &SessionContext) -> FetchResult {
        self.fetch_field(ctx, BalanceField::WrappedEther).await
    }

    /// Fetch all three balances concurrently. A failing field does not stop
    /// the others.
    pub async fn fetch_all(&self, ctx: &SessionContext) -> FetchAllReport {
        if ctx.active_account().is_none() {
            return FetchAllReport::skipped();
        }

        let (native, sample_token, wrapped_ether) = tokio::join!(
            self.fetch_native(ctx),
            self.fetch_sample_token(ctx),
            self.fetch_wrapped_ether(ctx),
        );

        FetchAllReport {
            native,
            sample_token,
            wrapped_ether,
        }
    }

    /// Fetch one balance for the active account and store it.
    pub async fn fetch_field(&self, ctx: &SessionContext, field: BalanceField) -> FetchResult {
        let Some(account) = ctx.active_account() else {
            debug!(%field, "No connected session, skipping balance fetch");
            return Ok(FetchOutcome::Skipped);
        };

        let raw = match self.read_raw(field, account).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%field, account = %account, error = %e, "Balance fetch failed");
                return Err(e);
            }
        };

        let formatted = format_units(raw, field.decimals());
        self.balances
            .send_modify(|set| set.set(field, formatted.clone()));

        debug!(%field, account = %account, balance = %formatted, "Balance updated");
        Ok(FetchOutcome::Updated(formatted))
    }

    async fn read_raw(&self, field: BalanceField, account: Address) -> Result<U256, SyncError> {
        let token = match field {
            BalanceField::Native => {
                return self
                    .gateway
                    .native_balance(account)
                    .await
                    .map_err(|source| SyncError::Gateway { field, source });
            }
            BalanceField::SampleToken => self.contracts.sample_token,
            BalanceField::WrappedEther => self.contracts.wrapped_ether,
        };

        let output = self
            .gateway
            .read(contracts::balance_of(token, account))
            .await
            .map_err(|source| SyncError::Gateway { field, source })?;

        contracts::decode_balance(&output).map_err(|e| SyncError::Decode {
            field,
            message: e.to_string(),
        })
    }
}
