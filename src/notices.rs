// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Submission notices shown to the user after a transaction is accepted.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::dispatch::Operation;

/// How many notices are retained.
const MAX_NOTICES: usize = 32;

/// A transaction the node accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    /// Operation that produced the transaction
    pub operation: Operation,
    /// Transaction hash
    pub tx_hash: String,
    /// Block explorer URL
    pub explorer_url: String,
    /// When the node accepted the transaction
    pub submitted_at: DateTime<Utc>,
}

impl Notice {
    pub fn message(&self) -> String {
        format!("transaction sent with tx hash: {}", self.tx_hash)
    }
}

/// Bounded, newest-last list of notices.
#[derive(Default)]
pub struct NoticeBoard {
    entries: RwLock<VecDeque<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == MAX_NOTICES {
            entries.pop_front();
        }
        entries.push_back(notice);
    }

    pub fn list(&self) -> Vec<Notice> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn latest(&self) -> Option<Notice> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
