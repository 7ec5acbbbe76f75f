// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token Playground - Sepolia Wallet Demo Service
//!
//! Connects a locally held key to the Sepolia test network, keeps the native,
//! sample token and wrapped ether balances of the connected account on
//! display, and submits mint / wrap / unwrap transactions.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and the demo page (Axum)
//! - `blockchain` - Network constants, contract ABIs, amounts, RPC client
//! - `gateway` - Contract access trait used by the services
//! - `wallet` - Local wallet session
//! - `sync` - Balance synchronizer
//! - `dispatch` - Transaction dispatcher and refresh table
//! - `watcher` - Session watcher driving full refreshes

pub mod api;
pub mod blockchain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod notices;
pub mod state;
pub mod sync;
pub mod wallet;
pub mod watcher;

#[cfg(test)]
mod testing;
