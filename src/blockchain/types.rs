// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// EVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Short identifier accepted by `set_default_network`
    pub id: &'static str,
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

impl NetworkConfig {
    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }

    /// Explorer link for an account or contract.
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }
}

/// Ethereum Sepolia testnet configuration.
pub const SEPOLIA: NetworkConfig = NetworkConfig {
    id: NETWORK_SEPOLIA,
    name: "Sepolia Testnet",
    chain_id: 11_155_111,
    rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
    explorer_url: "https://sepolia.etherscan.io",
};

/// Supported network identifier for this build.
pub const NETWORK_SEPOLIA: &str = "sepolia";

/// Validate network input for the Sepolia-only runtime.
pub fn ensure_sepolia_network(raw: Option<&str>) -> Result<&'static NetworkConfig, String> {
    let value = raw.unwrap_or(NETWORK_SEPOLIA).trim().to_ascii_lowercase();
    if value == NETWORK_SEPOLIA {
        Ok(&SEPOLIA)
    } else {
        Err(format!(
            "Only `{NETWORK_SEPOLIA}` network is supported in this deployment."
        ))
    }
}

/// Known token deployed on the test network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub address: Address,
}

/// Freely mintable demo token.
pub const SAMPLE_TOKEN: TokenInfo = TokenInfo {
    symbol: "SMPL",
    name: "Sample Token",
    decimals: 18,
    address: address!("0x688160C614c63e49C4cd59246e546b3bE03C43fd"),
};

/// Canonical WETH9 deployment on Sepolia.
pub const WRAPPED_ETHER: TokenInfo = TokenInfo {
    symbol: "WETH",
    name: "Wrapped Ether",
    decimals: 18,
    address: address!("0x7b79995e5f793A07Bc00c21412e50Ecae098E7f9"),
};

/// Decimals of the native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Contract addresses the synchronizer and dispatcher talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSet {
    pub sample_token: Address,
    pub wrapped_ether: Address,
}

impl Default for ContractSet {
    fn default() -> Self {
        Self {
            sample_token: SAMPLE_TOKEN.address,
            wrapped_ether: WRAPPED_ETHER.address,
        }
    }
}

/// One of the three balances shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceField {
    /// Native ETH
    Native,
    /// Sample token `balanceOf`
    SampleToken,
    /// Wrapped ether `balanceOf`
    WrappedEther,
}

impl BalanceField {
    pub const ALL: [BalanceField; 3] = [
        BalanceField::Native,
        BalanceField::SampleToken,
        BalanceField::WrappedEther,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceField::Native => "native",
            BalanceField::SampleToken => "sample-token",
            BalanceField::WrappedEther => "wrapped-ether",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == raw.trim().to_ascii_lowercase())
    }

    pub fn decimals(&self) -> u8 {
        match self {
            BalanceField::Native => NATIVE_DECIMALS,
            BalanceField::SampleToken => SAMPLE_TOKEN.decimals,
            BalanceField::WrappedEther => WRAPPED_ETHER.decimals,
        }
    }
}

impl std::fmt::Display for BalanceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayed balances. Each field is updated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BalanceSet {
    /// Native ETH balance, formatted
    pub native: String,
    /// Sample token balance, formatted
    pub sample_token: String,
    /// Wrapped ether balance, formatted
    pub wrapped_ether: String,
}

impl Default for BalanceSet {
    fn default() -> Self {
        Self {
            native: "0".to_string(),
            sample_token: "0".to_string(),
            wrapped_ether: "0".to_string(),
        }
    }
}

impl BalanceSet {
    pub fn get(&self, field: BalanceField) -> &str {
        match field {
            BalanceField::Native => &self.native,
            BalanceField::SampleToken => &self.sample_token,
            BalanceField::WrappedEther => &self.wrapped_ether,
        }
    }

    pub fn set(&mut self, field: BalanceField, value: String) {
        match field {
            BalanceField::Native => self.native = value,
            BalanceField::SampleToken => self.sample_token = value,
            BalanceField::WrappedEther => self.wrapped_ether = value,
        }
    }
}
