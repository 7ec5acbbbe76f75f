// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    blockchain::{BalanceField, BalanceSet},
    dispatch::Operation,
    notices::Notice,
    state::AppState,
    wallet::ConnectionState,
};

pub mod balances;
pub mod health;
pub mod page;
pub mod session;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/session", get(session::get_session))
        .route("/session/connect", post(session::connect))
        .route("/session/disconnect", post(session::disconnect))
        .route("/balances", get(balances::get_balances))
        .route("/balances/refresh", post(balances::refresh_all))
        .route("/balances/{field}/refresh", post(balances::refresh_field))
        .route("/transactions/mint", post(transactions::mint))
        .route("/transactions/wrap", post(transactions::wrap))
        .route("/transactions/unwrap", post(transactions::unwrap))
        .route("/notices", get(transactions::list_notices));

    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        session::get_session,
        session::connect,
        session::disconnect,
        balances::get_balances,
        balances::refresh_all,
        balances::refresh_field,
        transactions::mint,
        transactions::wrap,
        transactions::unwrap,
        transactions::list_notices
    ),
    components(
        schemas(
            BalanceField,
            BalanceSet,
            ConnectionState,
            Operation,
            Notice,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            session::SessionResponse,
            balances::BalancesResponse,
            balances::FieldError,
            transactions::TransactionResponse,
            transactions::NoticeListResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Session", description = "Wallet connection"),
        (name = "Balances", description = "Native and token balances"),
        (name = "Transactions", description = "Mint, wrap and unwrap")
    )
)]
struct ApiDoc;
