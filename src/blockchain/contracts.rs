// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract interfaces and call encoding for the demo tokens.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

use crate::gateway::ContractCall;

// Define the token interfaces using alloy's sol! macro
sol! {
    /// Mintable ERC-20 used by the demo.
    interface ISampleToken {
        function balanceOf(address account) external view returns (uint256);
        function mint(address to, uint256 amount) external;
    }

    /// WETH9-style wrapper around the native currency.
    interface IWrappedEther {
        function balanceOf(address account) external view returns (uint256);
        function deposit() external payable;
        function withdraw(uint256 wad) external;
    }
}

/// Build a `balanceOf(account)` read. Both token interfaces share the selector.
pub fn balance_of(token: Address, account: Address) -> ContractCall {
    ContractCall::new(token, ISampleToken::balanceOfCall { account }.abi_encode())
}

/// Decode the `uint256` returned by `balanceOf`.
pub fn decode_balance(output: &Bytes) -> Result<U256, alloy::sol_types::Error> {
    ISampleToken::balanceOfCall::abi_decode_returns(output)
}

/// Build a `mint(to, amount)` transaction.
pub fn mint(token: Address, to: Address, amount: U256) -> ContractCall {
    ContractCall::new(token, ISampleToken::mintCall { to, amount }.abi_encode())
}

/// Build a payable `deposit()` transaction carrying `value` wei.
pub fn deposit(wrapped: Address, value: U256) -> ContractCall {
    ContractCall::new(wrapped, IWrappedEther::depositCall {}.abi_encode()).with_value(value)
}

/// Build a `withdraw(wad)` transaction.
pub fn withdraw(wrapped: Address, wad: U256) -> ContractCall {
    ContractCall::new(wrapped, IWrappedEther::withdrawCall { wad }.abi_encode())
}
