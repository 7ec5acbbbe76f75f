// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState, wallet::ConnectionState};

/// Current wallet session and target network.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// `connected` or `disconnected`
    pub state: ConnectionState,
    /// Active account, when connected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Network name
    pub network: String,
    /// Chain ID
    pub chain_id: u64,
}

impl SessionResponse {
    pub fn from_state(state: &AppState) -> Self {
        let ctx = state.wallet.context();
        Self {
            state: state.wallet.connection_state(),
            account: ctx.account.map(|a| a.to_string()),
            network: ctx.network.name.to_string(),
            chain_id: ctx.network.chain_id,
        }
    }
}

/// Get the current session.
#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    responses((status = 200, description = "Current session", body = SessionResponse))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse::from_state(&state))
}

/// Connect the locally configured wallet.
///
/// Opening a session triggers a full balance refresh in the background.
#[utoipa::path(
    post,
    path = "/v1/session/connect",
    tag = "Session",
    responses(
        (status = 200, description = "Wallet connected", body = SessionResponse),
        (status = 500, description = "Configured key could not be loaded"),
        (status = 503, description = "No wallet key configured")
    )
)]
pub async fn connect(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    state.wallet.connect()?;
    Ok(Json(SessionResponse::from_state(&state)))
}

/// Disconnect the wallet. Displayed balances keep their last values.
#[utoipa::path(
    post,
    path = "/v1/session/disconnect",
    tag = "Session",
    responses((status = 200, description = "Wallet disconnected", body = SessionResponse))
)]
pub async fn disconnect(State(state): State<AppState>) -> Json<SessionResponse> {
    state.wallet.disconnect();
    Json(SessionResponse::from_state(&state))
}
