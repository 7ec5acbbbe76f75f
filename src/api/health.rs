// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::gateway::{verify_chain, GatewayError};
use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// JSON-RPC node reachability.
    pub rpc: String,
    /// Latest block seen, when the node answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Whether the node serves the configured network ("ok", "mismatch" or
    /// "unknown").
    pub network: String,
    /// Chain ID reported by the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Wallet connection state.
    pub wallet: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint handler.
///
/// Returns 200 if the RPC node answers and serves the configured network,
/// 503 otherwise. A disconnected wallet is reported but does not degrade the
/// service.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let block = state.gateway.block_number().await;
    let rpc_ok = block.is_ok();

    let network = state.wallet.network();
    let (network_check, chain_id) = match verify_chain(state.gateway.as_ref(), &network).await {
        Ok(id) => ("ok", Some(id)),
        Err(GatewayError::ChainMismatch { actual, .. }) => ("mismatch", Some(actual)),
        Err(_) => ("unknown", None),
    };
    let healthy = rpc_ok && network_check == "ok";

    let response = ReadyResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            rpc: if rpc_ok { "ok" } else { "unavailable" }.to_string(),
            block_number: block.ok(),
            network: network_check.to_string(),
            chain_id,
            wallet: if state.wallet.session().connected {
                "connected"
            } else {
                "disconnected"
            }
            .to_string(),
        },
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
