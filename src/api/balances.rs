// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance display and refresh endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::{BalanceField, BalanceSet},
    error::ApiError,
    state::AppState,
    sync::FetchOutcome,
};

/// A field whose refresh failed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: BalanceField,
    pub error: String,
}

/// Displayed balances for the active account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalancesResponse {
    /// Active account, when connected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// True when no session was connected and nothing was fetched
    pub skipped: bool,
    /// Current displayed balances
    pub balances: BalanceSet,
    /// Fields whose refresh failed; they keep their previous values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl BalancesResponse {
    fn new(state: &AppState, skipped: bool, errors: Vec<FieldError>) -> Self {
        Self {
            account: state.wallet.account().map(|a| a.to_string()),
            skipped,
            balances: state.synchronizer.balances(),
            errors,
        }
    }
}

/// Get the displayed balances without touching the chain.
#[utoipa::path(
    get,
    path = "/v1/balances",
    tag = "Balances",
    responses((status = 200, description = "Displayed balances", body = BalancesResponse))
)]
pub async fn get_balances(State(state): State<AppState>) -> Json<BalancesResponse> {
    Json(BalancesResponse::new(&state, false, Vec::new()))
}

/// Re-fetch all three balances.
///
/// Fields are fetched independently; a failed field is listed in `errors`
/// and keeps its previous value.
#[utoipa::path(
    post,
    path = "/v1/balances/refresh",
    tag = "Balances",
    responses((status = 200, description = "Balances refreshed", body = BalancesResponse))
)]
pub async fn refresh_all(State(state): State<AppState>) -> Json<BalancesResponse> {
    let ctx = state.wallet.context();
    let report = state.synchronizer.fetch_all(&ctx).await;

    let errors = report
        .errors()
        .into_iter()
        .map(|e| FieldError {
            field: e.field(),
            error: e.to_string(),
        })
        .collect();

    Json(BalancesResponse::new(&state, report.is_skipped(), errors))
}

/// Re-fetch one balance.
#[utoipa::path(
    post,
    path = "/v1/balances/{field}/refresh",
    tag = "Balances",
    params(
        ("field" = String, Path, description = "`native`, `sample-token` or `wrapped-ether`")
    ),
    responses(
        (status = 200, description = "Balance refreshed", body = BalancesResponse),
        (status = 404, description = "Unknown balance field"),
        (status = 502, description = "Balance read failed")
    )
)]
pub async fn refresh_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let field = BalanceField::parse(&field)
        .ok_or_else(|| ApiError::not_found(format!("Unknown balance field `{field}`")))?;

    let ctx = state.wallet.context();
    let outcome = state.synchronizer.fetch_field(&ctx, field).await?;

    Ok(Json(BalancesResponse::new(
        &state,
        outcome == FetchOutcome::Skipped,
        Vec::new(),
    )))
}
