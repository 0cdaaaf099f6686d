// Copyright (c) 2023 RBB S.r.l
// opensource@mintlayer.org
// SPDX-License-Identifier: MIT
// Licensed under the MIT License;
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://github.com/mintlayer/mintlayer-core/blob/master/LICENSE
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A programmable in-memory chain backend for tests.

use std::collections::BTreeSet;
use std::sync::Mutex;

use common::primitives::BlockHeight;
use wallet_types::BlockHash;

use crate::backend_traits::{BackendError, ChainBackend};
use crate::types::{BestBlock, RemoteTransaction, TxAnchor};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MockError {}

struct MockState {
    best: BestBlock,
    txs: Vec<RemoteTransaction>,
    extra_used_addresses: BTreeSet<Vec<u8>>,
}

/// A chain backend whose chain is scripted by the test: transactions are
/// pushed in, the tip is moved, and a reorganization is simulated by
/// dropping recent transactions and moving the tip to a lower block.
pub struct MockChainBackend {
    state: Mutex<MockState>,
}

impl MockChainBackend {
    pub fn new(best: BestBlock) -> Self {
        MockChainBackend {
            state: Mutex::new(MockState {
                best,
                txs: Vec::new(),
                extra_used_addresses: BTreeSet::new(),
            }),
        }
    }

    pub fn set_best_block(&self, best: BestBlock) {
        self.state.lock().expect("mock poisoned").best = best;
    }

    pub fn push_transaction(&self, tx: RemoteTransaction) {
        self.state.lock().expect("mock poisoned").txs.push(tx);
    }

    /// Mark an address as used on-chain without any transaction touching it.
    pub fn mark_address_in_use(&self, address: Vec<u8>) {
        self.state.lock().expect("mock poisoned").extra_used_addresses.insert(address);
    }

    /// Simulate a reorg: every transaction anchored above the given height
    /// disappears from the remote's view of the chain.
    pub fn rollback_to_height(&self, height: BlockHeight) {
        let mut state = self.state.lock().expect("mock poisoned");
        state.txs.retain(|tx| match tx.block_height() {
            Some(tx_height) => tx_height <= height,
            None => true,
        });
    }

    /// Drop one transaction from the remote's view (e.g. evicted from the
    /// mempool). Returns the removed transaction, if it was known.
    pub fn remove_transaction(
        &self,
        hash: &wallet_types::TxHash,
    ) -> Option<RemoteTransaction> {
        let mut state = self.state.lock().expect("mock poisoned");
        let position = state.txs.iter().position(|tx| tx.hash == *hash)?;
        Some(state.txs.remove(position))
    }
}

impl ChainBackend for MockChainBackend {
    type Error = MockError;

    fn get_best_block(&self) -> Result<BestBlock, BackendError<MockError>> {
        Ok(self.state.lock().expect("mock poisoned").best.clone())
    }

    fn get_transactions_history(
        &self,
        addresses: &[Vec<u8>],
        after: Option<TxAnchor>,
        _until_block: BlockHash,
    ) -> Result<Vec<RemoteTransaction>, BackendError<MockError>> {
        let state = self.state.lock().expect("mock poisoned");

        let after_height = match after {
            Some(anchor) => {
                let anchored = state.txs.iter().find(|tx| {
                    tx.hash == anchor.tx
                        && tx.block.as_ref().map(|block| block.hash) == Some(anchor.block)
                });
                match anchored {
                    Some(tx) => tx.block_height(),
                    None => return Err(BackendError::AnchorNotFound),
                }
            }
            None => None,
        };

        let queried: BTreeSet<&Vec<u8>> = addresses.iter().collect();
        let result = state
            .txs
            .iter()
            .filter(|tx| tx.referenced_addresses().any(|address| queried.contains(address)))
            .filter(|tx| match (tx.block_height(), after_height) {
                (Some(height), Some(after_height)) => height > after_height,
                _ => true,
            })
            .cloned()
            .collect();
        Ok(result)
    }

    fn check_addresses_in_use(
        &self,
        addresses: &[Vec<u8>],
    ) -> Result<Vec<Vec<u8>>, BackendError<MockError>> {
        let state = self.state.lock().expect("mock poisoned");
        let used: BTreeSet<Vec<u8>> = state
            .txs
            .iter()
            .flat_map(|tx| tx.referenced_addresses().cloned())
            .chain(state.extra_used_addresses.iter().cloned())
            .collect();
        Ok(addresses.iter().filter(|address| used.contains(*address)).cloned().collect())
    }
}
