// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Watcher
//!
//! Background task that refreshes every balance when a wallet session opens
//! or the active account changes.
//!
//! The session channel only keeps the latest value, so a disconnect followed
//! quickly by a reconnect may arrive as a single update. Sessions carry a
//! generation that every connect increments; a new generation always counts
//! as a transition.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`, following the same pattern as
//! the server's graceful shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::sync::BalanceSynchronizer;
use crate::wallet::{LocalWallet, Session};

/// Whether a session change calls for a full balance refresh.
pub fn should_refresh(previous: &Session, next: &Session) -> bool {
    if !next.connected {
        return false;
    }
    !previous.connected
        || previous.account != next.account
        || previous.generation != next.generation
}

/// Runs `fetch_all` on session transitions.
pub struct SessionWatcher {
    wallet: Arc<LocalWallet>,
    synchronizer: Arc<BalanceSynchronizer>,
}

impl SessionWatcher {
    pub fn new(wallet: Arc<LocalWallet>, synchronizer: Arc<BalanceSynchronizer>) -> Self {
        Self {
            wallet,
            synchronizer,
        }
    }

    /// Run the watcher loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(watcher.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        let mut sessions = self.wallet.subscribe();
        // The session at subscription time is a transition from nothing.
        let mut previous = Session::default();
        sessions.mark_changed();

        info!("Session watcher starting");

        loop {
            tokio::select! {
                changed = sessions.changed() => {
                    if changed.is_err() {
                        info!("Session channel closed, watcher stopping");
                        return;
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Session watcher shutting down");
                    return;
                }
            }

            let next = sessions.borrow_and_update().clone();
            if should_refresh(&previous, &next) {
                self.refresh(&next).await;
            }
            previous = next;
        }
    }

    async fn refresh(&self, session: &Session) {
        info!(account = ?session.account, "Session changed, refreshing balances");

        let ctx = self.wallet.context();
        let report = self.synchronizer.fetch_all(&ctx).await;
        for error in report.errors() {
            warn!(field = %error.field(), error = %error, "Balance refresh failed");
        }
    }
}
