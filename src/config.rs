// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `RPC_URL` | Sepolia JSON-RPC endpoint | public Sepolia node |
//! | `WALLET_KEY_FILE` | PEM private key for the local wallet | unset |
//! | `WALLET_PRIVATE_KEY` | Hex private key, used when no key file is set | unset |
//! | `AUTO_CONNECT` | Connect the wallet at startup | `false` |
//! | `SAMPLE_TOKEN_ADDRESS` | Sample token contract override | built-in |
//! | `WRAPPED_ETHER_ADDRESS` | Wrapped ether contract override | built-in |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{collections::HashMap, net::SocketAddr, path::PathBuf, str::FromStr};

use alloy::primitives::Address;

use crate::blockchain::{ContractSet, SEPOLIA};
use crate::wallet::KeySource;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const RPC_URL_ENV: &str = "RPC_URL";
pub const WALLET_KEY_FILE_ENV: &str = "WALLET_KEY_FILE";
pub const WALLET_PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
pub const AUTO_CONNECT_ENV: &str = "AUTO_CONNECT";
pub const SAMPLE_TOKEN_ADDRESS_ENV: &str = "SAMPLE_TOKEN_ADDRESS";
pub const WRAPPED_ETHER_ADDRESS_ENV: &str = "WRAPPED_ETHER_ADDRESS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

impl ConfigError {
    fn invalid(name: &'static str, message: impl ToString) -> Self {
        ConfigError::Invalid {
            name,
            message: message.to_string(),
        }
    }
}

/// Settings resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub rpc_url: String,
    pub key_source: Option<KeySource>,
    pub auto_connect: bool,
    pub contracts: ContractSet,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Load from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let host = get(HOST_ENV).unwrap_or(DEFAULT_HOST);
        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid(PORT_ENV, e))?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| ConfigError::invalid(HOST_ENV, e))?;

        let key_source = match (get(WALLET_KEY_FILE_ENV), get(WALLET_PRIVATE_KEY_ENV)) {
            (Some(path), _) => Some(KeySource::PemFile(PathBuf::from(path))),
            (None, Some(hex)) => Some(KeySource::Hex(hex.to_string())),
            (None, None) => None,
        };

        let auto_connect = match get(AUTO_CONNECT_ENV) {
            Some(raw) => parse_bool(raw).ok_or_else(|| {
                ConfigError::invalid(AUTO_CONNECT_ENV, format!("expected true/false, got `{raw}`"))
            })?,
            None => false,
        };

        let defaults = ContractSet::default();
        let contracts = ContractSet {
            sample_token: parse_address(get(SAMPLE_TOKEN_ADDRESS_ENV), SAMPLE_TOKEN_ADDRESS_ENV)?
                .unwrap_or(defaults.sample_token),
            wrapped_ether: parse_address(
                get(WRAPPED_ETHER_ADDRESS_ENV),
                WRAPPED_ETHER_ADDRESS_ENV,
            )?
            .unwrap_or(defaults.wrapped_ether),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(str::to_ascii_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr,
            rpc_url: get(RPC_URL_ENV).unwrap_or(SEPOLIA.rpc_url).to_string(),
            key_source,
            auto_connect,
            contracts,
            log_format,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_address(raw: Option<&str>, name: &'static str) -> Result<Option<Address>, ConfigError> {
    raw.map(|value| Address::from_str(value).map_err(|e| ConfigError::invalid(name, e)))
        .transpose()
}
