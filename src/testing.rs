// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted in-memory gateway for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{address, Address, Bytes, FixedBytes, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::blockchain::{ContractSet, SEPOLIA};
use crate::gateway::{ContractCall, ContractGateway, GatewayError};

pub const ONE_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

pub fn account() -> Address {
    address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
}

pub fn contract_set() -> ContractSet {
    ContractSet {
        sample_token: address!("0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a"),
        wrapped_ether: address!("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"),
    }
}

pub fn tx_hash(byte: u8) -> TxHash {
    FixedBytes::repeat_byte(byte)
}

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    NativeBalance(Address),
    BalanceOf(Address),
    Write {
        to: Address,
        selector: Option<FixedBytes<4>>,
        value: U256,
    },
}

struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<T, GatewayError>,
}

impl<T> Scripted<T> {
    fn ready(result: Result<T, GatewayError>) -> Self {
        Self { gate: None, result }
    }

    async fn resolve(self) -> Result<T, GatewayError> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.result
    }
}

#[derive(Default)]
struct Script {
    native: VecDeque<Scripted<U256>>,
    reads: HashMap<Address, VecDeque<Scripted<Bytes>>>,
    writes: VecDeque<Scripted<TxHash>>,
}

/// Gateway that answers from per-source queues and records every call.
#[derive(Default, Clone)]
pub struct MockGateway {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    unreachable: Arc<Mutex<bool>>,
    chain_id: Arc<Mutex<Option<u64>>>,
}

fn encode_balance(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn balance_reads(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, GatewayCall::Write { .. }))
            .collect()
    }

    /// Wait until at least `count` calls have been recorded.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls.lock().unwrap().len() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Make `block_number` and `chain_id` fail, as if the node were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    /// Report `chain_id` instead of Sepolia's.
    pub fn set_chain_id(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = Some(chain_id);
    }

    pub fn push_native_balance(&self, value: U256) {
        self.push_native(Scripted::ready(Ok(value)));
    }

    pub fn push_native_error(&self, error: GatewayError) {
        self.push_native(Scripted::ready(Err(error)));
    }

    /// Queue a native balance that resolves only once the returned sender fires.
    pub fn push_gated_native_balance(&self, value: U256) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push_native(Scripted {
            gate: Some(rx),
            result: Ok(value),
        });
        tx
    }

    pub fn push_token_balance(&self, token: Address, value: U256) {
        self.push_read(token, Scripted::ready(Ok(encode_balance(value))));
    }

    pub fn push_token_error(&self, token: Address, error: GatewayError) {
        self.push_read(token, Scripted::ready(Err(error)));
    }

    pub fn push_raw_read(&self, token: Address, output: Vec<u8>) {
        self.push_read(token, Scripted::ready(Ok(Bytes::from(output))));
    }

    pub fn push_gated_token_balance(&self, token: Address, value: U256) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push_read(
            token,
            Scripted {
                gate: Some(rx),
                result: Ok(encode_balance(value)),
            },
        );
        tx
    }

    pub fn push_write(&self, result: Result<TxHash, GatewayError>) {
        self.script
            .lock()
            .unwrap()
            .writes
            .push_back(Scripted::ready(result));
    }

    fn push_native(&self, entry: Scripted<U256>) {
        self.script.lock().unwrap().native.push_back(entry);
    }

    fn push_read(&self, token: Address, entry: Scripted<Bytes>) {
        self.script
            .lock()
            .unwrap()
            .reads
            .entry(token)
            .or_default()
            .push_back(entry);
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unscripted<T>(what: &str) -> Scripted<T> {
    Scripted::ready(Err(GatewayError::Rpc(format!("unscripted {what}"))))
}

#[async_trait]
impl ContractGateway for MockGateway {
    async fn block_number(&self) -> Result<u64, GatewayError> {
        if *self.unreachable.lock().unwrap() {
            return Err(GatewayError::Rpc("connection refused".into()));
        }
        Ok(1)
    }

    async fn chain_id(&self) -> Result<u64, GatewayError> {
        if *self.unreachable.lock().unwrap() {
            return Err(GatewayError::Rpc("connection refused".into()));
        }
        Ok(self.chain_id.lock().unwrap().unwrap_or(SEPOLIA.chain_id))
    }

    async fn native_balance(&self, account: Address) -> Result<U256, GatewayError> {
        self.record(GatewayCall::NativeBalance(account));
        let entry = self.script.lock().unwrap().native.pop_front();
        entry.unwrap_or_else(|| unscripted("native balance")).resolve().await
    }

    async fn read(&self, call: ContractCall) -> Result<Bytes, GatewayError> {
        self.record(GatewayCall::BalanceOf(call.to));
        let entry = self
            .script
            .lock()
            .unwrap()
            .reads
            .get_mut(&call.to)
            .and_then(VecDeque::pop_front);
        entry.unwrap_or_else(|| unscripted("read")).resolve().await
    }

    async fn write(&self, call: ContractCall) -> Result<TxHash, GatewayError> {
        self.record(GatewayCall::Write {
            to: call.to,
            selector: call.selector(),
            value: call.value,
        });
        let entry = self.script.lock().unwrap().writes.pop_front();
        entry.unwrap_or_else(|| unscripted("write")).resolve().await
    }
}
