// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC backed contract gateway.

use std::sync::Arc;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxHash, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::gateway::{ContractCall, ContractGateway, GatewayError};
use crate::wallet::LocalWallet;

/// HTTP provider type for read-only calls (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Contract gateway talking to an EVM node over HTTP.
///
/// Reads go through a shared provider. Writes build a signing provider from
/// the wallet's current key, so a disconnect takes effect immediately.
pub struct EvmGateway {
    rpc_url: url::Url,
    provider: HttpProvider,
    wallet: Arc<LocalWallet>,
}

impl EvmGateway {
    /// Create a gateway for the given RPC endpoint.
    pub fn new(rpc_url: &str, wallet: Arc<LocalWallet>) -> Result<Self, GatewayError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| GatewayError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url.clone());

        Ok(Self {
            rpc_url: url,
            provider,
            wallet,
        })
    }
}

/// Classify a `send_transaction` failure.
///
/// An error response from the node, or a local signing failure, means the
/// transaction itself was refused. Anything else is a transport problem.
fn submission_error(err: TransportError) -> GatewayError {
    if err.is_error_resp() || err.is_local_usage_error() {
        GatewayError::Rejected(err.to_string())
    } else {
        GatewayError::Rpc(err.to_string())
    }
}

#[async_trait]
impl ContractGateway for EvmGateway {
    async fn block_number(&self) -> Result<u64, GatewayError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    async fn chain_id(&self) -> Result<u64, GatewayError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    async fn native_balance(&self, account: Address) -> Result<U256, GatewayError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    async fn read(&self, call: ContractCall) -> Result<Bytes, GatewayError> {
        debug!(to = %call.to, "eth_call");
        let tx = TransactionRequest::default()
            .to(call.to)
            .input(call.input.into());

        self.provider
            .call(tx)
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    async fn write(&self, call: ContractCall) -> Result<TxHash, GatewayError> {
        let wallet = self
            .wallet
            .ethereum_wallet()
            .ok_or(GatewayError::NotConnected)?;

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let tx = TransactionRequest::default()
            .to(call.to)
            .input(call.input.into())
            .value(call.value);

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(submission_error)?;

        let tx_hash = *pending.tx_hash();
        info!(to = %call.to, tx_hash = %tx_hash, "Transaction accepted");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::{RpcError, TransportErrorKind};

    use super::*;

    #[test]
    fn node_error_response_is_a_rejection() {
        let err = RpcError::ErrorResp(ErrorPayload::internal_error_message(
            "insufficient funds for gas * price + value".into(),
        ));
        assert!(matches!(submission_error(err), GatewayError::Rejected(_)));
    }

    #[test]
    fn transport_failure_is_an_rpc_error() {
        let err = TransportErrorKind::custom_str("connection refused");
        assert!(matches!(submission_error(err), GatewayError::Rpc(_)));
    }

    #[test]
    fn signing_failure_is_a_rejection() {
        let err = TransportError::local_usage_str("signer unavailable");
        assert!(matches!(submission_error(err), GatewayError::Rejected(_)));
    }

    #[test]
    fn rejects_invalid_rpc_url() {
        let wallet = Arc::new(LocalWallet::new(None));
        let result = EvmGateway::new("not a url", wallet);
        assert!(matches!(result, Err(GatewayError::InvalidRpcUrl(_))));
    }

    #[tokio::test]
    async fn write_requires_connected_wallet() {
        let wallet = Arc::new(LocalWallet::new(None));
        let gateway = EvmGateway::new("http://127.0.0.1:8545", wallet).unwrap();

        let call = ContractCall::new(Address::ZERO, vec![0u8; 4]);
        let err = gateway.write(call).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConnected));
    }
}
