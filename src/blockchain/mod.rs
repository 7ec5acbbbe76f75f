// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for the Sepolia test network.
//!
//! This module provides functionality for:
//! - Querying native ETH and ERC-20 token balances
//! - Encoding mint / deposit / withdraw calls
//! - Transaction signing and broadcasting

pub mod amount;
pub mod client;
pub mod contracts;
pub mod signing;
pub mod types;

pub use amount::{format_ether, format_units, parse_ether, parse_units, AmountError};
pub use client::EvmGateway;
pub use types::*;
