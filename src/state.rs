// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::blockchain::ContractSet;
use crate::dispatch::TransactionDispatcher;
use crate::gateway::ContractGateway;
use crate::notices::NoticeBoard;
use crate::sync::BalanceSynchronizer;
use crate::wallet::LocalWallet;

#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<LocalWallet>,
    pub gateway: Arc<dyn ContractGateway>,
    pub synchronizer: Arc<BalanceSynchronizer>,
    pub dispatcher: Arc<TransactionDispatcher>,
    pub notices: Arc<NoticeBoard>,
}

impl AppState {
    pub fn new(
        wallet: Arc<LocalWallet>,
        gateway: Arc<dyn ContractGateway>,
        contracts: ContractSet,
    ) -> Self {
        let synchronizer = Arc::new(BalanceSynchronizer::new(gateway.clone(), contracts));
        let notices = Arc::new(NoticeBoard::new());
        let dispatcher = Arc::new(TransactionDispatcher::new(
            gateway.clone(),
            synchronizer.clone(),
            notices.clone(),
        ));

        Self {
            wallet,
            gateway,
            synchronizer,
            dispatcher,
            notices,
        }
    }
}
