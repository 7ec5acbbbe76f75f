// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints: mint, wrap, unwrap, and the notice list.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::{BalanceField, BalanceSet},
    dispatch::Operation,
    error::ApiError,
    notices::Notice,
    state::AppState,
};

// =============================================================================
// Response Types
// =============================================================================

/// Transaction submission response.
///
/// Returned as soon as the node accepts the transaction. The balances listed
/// in `refreshing` are re-fetched in the background; `balances` is the
/// display state at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub operation: Operation,
    /// `submitted`, or `skipped` when no wallet is connected
    pub status: String,
    /// Transaction hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Block explorer URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// Text shown to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Balances being re-fetched after acceptance
    #[serde(default)]
    pub refreshing: Vec<BalanceField>,
    pub balances: BalanceSet,
}

/// Recent accepted transactions.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeListResponse {
    pub notices: Vec<Notice>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn submit(state: AppState, operation: Operation) -> Result<Json<TransactionResponse>, ApiError> {
    let ctx = state.wallet.context();

    let Some(submission) = state.dispatcher.submit(&ctx, operation).await? else {
        return Ok(Json(TransactionResponse {
            operation,
            status: "skipped".to_string(),
            tx_hash: None,
            explorer_url: None,
            message: None,
            refreshing: Vec::new(),
            balances: state.synchronizer.balances(),
        }));
    };

    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.refresh_after(&ctx, operation).await;
    });

    Ok(Json(TransactionResponse {
        operation,
        status: "submitted".to_string(),
        tx_hash: Some(submission.tx_hash.to_string()),
        explorer_url: Some(submission.explorer_url),
        message: Some(submission.message),
        refreshing: operation.refreshes().to_vec(),
        balances: state.synchronizer.balances(),
    }))
}

/// Mint 1 sample token to the active account.
#[utoipa::path(
    post,
    path = "/v1/transactions/mint",
    tag = "Transactions",
    responses(
        (status = 200, description = "Transaction accepted or skipped", body = TransactionResponse),
        (status = 422, description = "Transaction rejected"),
        (status = 502, description = "RPC node error")
    )
)]
pub async fn mint(State(state): State<AppState>) -> Result<Json<TransactionResponse>, ApiError> {
    submit(state, Operation::Mint).await
}

/// Wrap 0.1 ETH into wrapped ether.
#[utoipa::path(
    post,
    path = "/v1/transactions/wrap",
    tag = "Transactions",
    responses(
        (status = 200, description = "Transaction accepted or skipped", body = TransactionResponse),
        (status = 422, description = "Transaction rejected"),
        (status = 502, description = "RPC node error")
    )
)]
pub async fn wrap(State(state): State<AppState>) -> Result<Json<TransactionResponse>, ApiError> {
    submit(state, Operation::Wrap).await
}

/// Unwrap 0.1 wrapped ether back into ETH.
#[utoipa::path(
    post,
    path = "/v1/transactions/unwrap",
    tag = "Transactions",
    responses(
        (status = 200, description = "Transaction accepted or skipped", body = TransactionResponse),
        (status = 422, description = "Transaction rejected"),
        (status = 502, description = "RPC node error")
    )
)]
pub async fn unwrap(State(state): State<AppState>) -> Result<Json<TransactionResponse>, ApiError> {
    submit(state, Operation::Unwrap).await
}

/// List recent accepted transactions, oldest first.
#[utoipa::path(
    get,
    path = "/v1/notices",
    tag = "Transactions",
    responses((status = 200, description = "Recent notices", body = NoticeListResponse))
)]
pub async fn list_notices(State(state): State<AppState>) -> Json<NoticeListResponse> {
    Json(NoticeListResponse {
        notices: state.notices.list(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;

    use super::*;
    use crate::blockchain::signing::{signer_from_hex, tests::DEV_KEY_HEX};
    use crate::gateway::GatewayError;
    use crate::testing::{contract_set, tx_hash, MockGateway, ONE_ETHER};
    use crate::wallet::LocalWallet;

    fn connected_state(gateway: &Arc<MockGateway>) -> AppState {
        let wallet = Arc::new(LocalWallet::new(None));
        wallet.connect_with(signer_from_hex(DEV_KEY_HEX).unwrap());
        AppState::new(wallet, gateway.clone(), contract_set())
    }

    async fn wait_for_sample_token(state: &AppState, expected: &str) {
        let mut rx = state.synchronizer.subscribe();
        tokio::time::timeout(Duration::from_secs(5), async {
            while state.synchronizer.balances().sample_token != expected {
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("sample token refreshed");
    }

    #[tokio::test]
    async fn mint_returns_hash_then_refreshes() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_write(Ok(tx_hash(0xab)));
        gateway.push_token_balance(contract_set().sample_token, ONE_ETHER);
        let state = connected_state(&gateway);

        let Json(body) = mint(State(state.clone())).await.unwrap();

        assert_eq!(body.status, "submitted");
        assert_eq!(body.tx_hash, Some(tx_hash(0xab).to_string()));
        assert_eq!(
            body.message.as_deref(),
            Some(format!("transaction sent with tx hash: {}", tx_hash(0xab)).as_str())
        );
        assert_eq!(body.refreshing, vec![BalanceField::SampleToken]);

        wait_for_sample_token(&state, "1.0").await;

        let Json(list) = list_notices(State(state)).await;
        assert_eq!(list.notices.len(), 1);
    }

    #[tokio::test]
    async fn response_does_not_wait_for_a_stalled_refresh() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_write(Ok(tx_hash(0xcd)));
        let release = gateway.push_gated_token_balance(contract_set().sample_token, ONE_ETHER);
        let state = connected_state(&gateway);

        let Json(body) = tokio::time::timeout(Duration::from_secs(5), wrap(State(state.clone())))
            .await
            .expect("response before refresh completes")
            .unwrap();

        assert_eq!(body.tx_hash, Some(tx_hash(0xcd).to_string()));
        assert_eq!(body.balances.sample_token, "0");
        assert!(state.notices.latest().is_some());

        release.send(()).unwrap();
        wait_for_sample_token(&state, "1.0").await;
    }

    #[tokio::test]
    async fn rejected_wrap_is_unprocessable() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_write(Err(GatewayError::Rejected("insufficient funds".into())));
        let state = connected_state(&gateway);

        let err = wrap(State(state.clone())).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.notices.is_empty());
    }

    #[tokio::test]
    async fn unwrap_while_disconnected_is_skipped() {
        let gateway = Arc::new(MockGateway::new());
        let state = AppState::new(
            Arc::new(LocalWallet::new(None)),
            gateway.clone(),
            contract_set(),
        );

        let Json(body) = unwrap(State(state)).await.unwrap();
        assert_eq!(body.status, "skipped");
        assert_eq!(body.tx_hash, None);
        assert!(body.refreshing.is_empty());
        assert!(gateway.calls().is_empty());
    }
}
