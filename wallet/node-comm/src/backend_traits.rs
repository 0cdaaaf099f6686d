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

use wallet_types::BlockHash;

use crate::types::{BestBlock, RemoteTransaction, TxAnchor};

/// How a chain-backend call can fail.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BackendError<E> {
    /// The anchor transaction the caller synced up to is no longer part of
    /// the remote chain. Expected during chain reorganizations; the caller
    /// reacts with rollback compensation, not by failing.
    #[error("Sync anchor is no longer part of the remote chain")]
    AnchorNotFound,
    /// Any other backend failure. Nothing has been written locally, so the
    /// next sync cycle is a clean retry.
    #[error("Chain backend error: {0}")]
    Backend(E),
}

/// The remote chain-indexing service the wallet synchronizes against.
///
/// All calls are plain blocking network requests from the wallet's point of
/// view and are made outside any storage transaction. Timeouts and retry
/// scheduling belong to the caller.
pub trait ChainBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The remote's current best block.
    fn get_best_block(&self) -> Result<BestBlock, BackendError<Self::Error>>;

    /// Transaction history touching any of the given addresses, in chain
    /// order, restricted to what comes after `after` (when given) and up to
    /// `until_block`. Fails with [BackendError::AnchorNotFound] when the
    /// anchor is gone from the chain.
    fn get_transactions_history(
        &self,
        addresses: &[Vec<u8>],
        after: Option<TxAnchor>,
        until_block: BlockHash,
    ) -> Result<Vec<RemoteTransaction>, BackendError<Self::Error>>;

    /// The subset of the given addresses that has ever been used on-chain.
    fn check_addresses_in_use(
        &self,
        addresses: &[Vec<u8>],
    ) -> Result<Vec<Vec<u8>>, BackendError<Self::Error>>;
}
