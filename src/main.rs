// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use token_playground::{
    api::router,
    blockchain::EvmGateway,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    gateway::{verify_chain, GatewayError},
    state::AppState,
    wallet::LocalWallet,
    watcher::SessionWatcher,
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("Shutdown signal received");
    shutdown.cancel();
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Arc::new(LocalWallet::new(config.key_source.clone()));
    let gateway = Arc::new(EvmGateway::new(&config.rpc_url, wallet.clone())?);

    match verify_chain(gateway.as_ref(), &wallet.network()).await {
        Ok(chain_id) => info!(chain_id, "RPC node chain verified"),
        Err(e @ GatewayError::ChainMismatch { .. }) => return Err(e.into()),
        Err(e) => warn!(error = %e, "Could not verify RPC chain at startup"),
    }

    let state = AppState::new(wallet.clone(), gateway, config.contracts);

    let shutdown = CancellationToken::new();
    let watcher = SessionWatcher::new(wallet.clone(), state.synchronizer.clone());
    let watcher_task = tokio::spawn(watcher.run(shutdown.clone()));

    if config.auto_connect {
        match wallet.connect() {
            Ok(session) => info!(account = ?session.account, "Wallet connected at startup"),
            Err(e) => warn!(error = %e, "Auto-connect failed; wallet stays disconnected"),
        }
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!(
        addr = %config.bind_addr,
        rpc_url = %config.rpc_url,
        sample_token = %config.contracts.sample_token,
        wrapped_ether = %config.contracts.wrapped_ether,
        "Token playground listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(e) = watcher_task.await {
        warn!(error = %e, "Session watcher task ended abnormally");
    }

    info!("Server shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
