// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Connector
//!
//! Holds the locally configured signing key and owns the [`Session`]. Every
//! change to the session is published on a `watch` channel so the session
//! watcher can refresh balances when an account becomes active.
//!
//! Everything else in the crate reads the session through a
//! [`SessionContext`] snapshot taken at the start of each operation.

use std::{
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;
use utoipa::ToSchema;

use crate::blockchain::{
    ensure_sepolia_network,
    signing::{self, KeyError},
    NetworkConfig, SEPOLIA,
};

/// Where the wallet key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// PKCS#8 or SEC1 PEM file
    PemFile(PathBuf),
    /// Hex-encoded secp256k1 key
    Hex(String),
}

/// Connection state of the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Wallet session as seen by the rest of the system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub account: Option<Address>,
    /// Incremented by every connect; kept across disconnect.
    pub generation: u64,
}

impl Session {
    pub fn connected(account: Address, generation: u64) -> Self {
        Self {
            connected: true,
            account: Some(account),
            generation,
        }
    }
}

/// Explicit session snapshot passed into every balance and transaction
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub connected: bool,
    pub account: Option<Address>,
    pub network: NetworkConfig,
}

impl SessionContext {
    pub fn connected(account: Address, network: NetworkConfig) -> Self {
        Self {
            connected: true,
            account: Some(account),
            network,
        }
    }

    pub fn disconnected(network: NetworkConfig) -> Self {
        Self {
            connected: false,
            account: None,
            network,
        }
    }

    /// The account to act for, or `None` when nothing should happen.
    pub fn active_account(&self) -> Option<Address> {
        if self.connected {
            self.account
        } else {
            None
        }
    }
}

/// Wallet connector errors.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet key configured (set WALLET_KEY_FILE or WALLET_PRIVATE_KEY)")]
    MissingKey,

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Failed to read key file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    UnsupportedNetwork(String),
}

/// Wallet connector backed by a locally held key.
pub struct LocalWallet {
    key_source: Option<KeySource>,
    signer: RwLock<Option<PrivateKeySigner>>,
    network: RwLock<NetworkConfig>,
    session: watch::Sender<Session>,
}

impl LocalWallet {
    /// Create a disconnected wallet targeting Sepolia.
    pub fn new(key_source: Option<KeySource>) -> Self {
        Self {
            key_source,
            signer: RwLock::new(None),
            network: RwLock::new(SEPOLIA),
            session: watch::Sender::new(Session::default()),
        }
    }

    /// Load the configured key and open a session.
    pub fn connect(&self) -> Result<Session, WalletError> {
        let signer = match self.key_source.as_ref().ok_or(WalletError::MissingKey)? {
            KeySource::PemFile(path) => {
                let bytes = std::fs::read(path).map_err(|source| WalletError::Io {
                    path: path.clone(),
                    source,
                })?;
                signing::signer_from_pem(&bytes)?
            }
            KeySource::Hex(hex) => signing::signer_from_hex(hex)?,
        };
        Ok(self.connect_with(signer))
    }

    /// Open a session with an already constructed signer.
    pub fn connect_with(&self, signer: PrivateKeySigner) -> Session {
        let account = signer.address();
        *self.signer.write().unwrap_or_else(PoisonError::into_inner) = Some(signer);

        let mut session = Session::default();
        self.session.send_modify(|current| {
            *current = Session::connected(account, current.generation + 1);
            session = current.clone();
        });

        info!(account = %account, generation = session.generation, "Wallet connected");
        session
    }

    /// Drop the signer and clear the session.
    pub fn disconnect(&self) {
        self.signer
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        info!("Wallet disconnected");
        self.session.send_modify(|current| {
            current.connected = false;
            current.account = None;
        });
    }

    pub fn account(&self) -> Option<Address> {
        self.session.borrow().account
    }

    pub fn connection_state(&self) -> ConnectionState {
        if self.session.borrow().connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Select the target network. Only Sepolia is accepted.
    pub fn set_default_network(&self, network_id: &str) -> Result<(), WalletError> {
        let network =
            ensure_sepolia_network(Some(network_id)).map_err(WalletError::UnsupportedNetwork)?;
        *self.network.write().unwrap_or_else(PoisonError::into_inner) = network.clone();
        Ok(())
    }

    pub fn network(&self) -> NetworkConfig {
        self.network
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the session and network for a single operation.
    pub fn context(&self) -> SessionContext {
        let session = self.session();
        SessionContext {
            connected: session.connected,
            account: session.account,
            network: self.network(),
        }
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Signing wallet for the gateway, if connected.
    pub fn ethereum_wallet(&self) -> Option<EthereumWallet> {
        self.signer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .map(signing::ethereum_wallet)
    }
}
