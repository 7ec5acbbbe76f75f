// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Contract Gateway
//!
//! The seam between the balance/transaction flow and the chain. The
//! synchronizer and dispatcher only ever talk to a [`ContractGateway`];
//! production uses [`crate::blockchain::EvmGateway`], tests use a scripted
//! in-memory gateway.

use alloy::primitives::{Address, Bytes, FixedBytes, TxHash, U256};
use async_trait::async_trait;

use crate::blockchain::NetworkConfig;

/// A contract call: target address, ABI-encoded input, and attached value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub input: Bytes,
    /// Native value in wei (payable calls only)
    pub value: U256,
}

impl ContractCall {
    pub fn new(to: Address, input: impl Into<Bytes>) -> Self {
        Self {
            to,
            input: input.into(),
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// First four bytes of the input, if present.
    pub fn selector(&self) -> Option<FixedBytes<4>> {
        self.input
            .get(..4)
            .map(|bytes| FixedBytes::<4>::from_slice(bytes))
    }
}

/// Errors returned by a gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("No wallet connected")]
    NotConnected,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("RPC node is on chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Read and write access to contracts on the active network.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Latest block number. Used to check reachability.
    async fn block_number(&self) -> Result<u64, GatewayError>;

    /// Chain ID reported by the node.
    async fn chain_id(&self) -> Result<u64, GatewayError>;

    /// Native currency balance of `account`, in wei.
    async fn native_balance(&self, account: Address) -> Result<U256, GatewayError>;

    /// Read-only call. No gas, no signature.
    async fn read(&self, call: ContractCall) -> Result<Bytes, GatewayError>;

    /// Sign and submit a transaction.
    ///
    /// Resolves once the node accepts the transaction into its pool, not once
    /// it is mined.
    async fn write(&self, call: ContractCall) -> Result<TxHash, GatewayError>;
}

/// Check that the node serves `network`. Returns the node's chain ID.
pub async fn verify_chain(
    gateway: &dyn ContractGateway,
    network: &NetworkConfig,
) -> Result<u64, GatewayError> {
    let actual = gateway.chain_id().await?;
    if actual != network.chain_id {
        return Err(GatewayError::ChainMismatch {
            expected: network.chain_id,
            actual,
        });
    }
    Ok(actual)
}
