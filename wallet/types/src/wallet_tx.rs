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

use parity_scale_codec::{Decode, Encode};

use crate::ids::{BlockRowId, TxDigest, TxHash};

/// The lifecycle state of a stored transaction.
///
/// A transaction row may be rewritten in place as its state changes, but its
/// hash, inputs and outputs are immutable once the row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, serde::Serialize)]
pub enum TxState {
    /// Submitted or observed, not yet in any block.
    #[codec(index = 0)]
    Pending,
    /// Anchored in a block, ordered within it by `tx_ordinal`.
    #[codec(index = 1)]
    InBlock {
        block: BlockRowId,
        tx_ordinal: u32,
    },
    /// Anchored in a block but rejected by the ledger rules there.
    #[codec(index = 2)]
    Failed {
        block: BlockRowId,
        tx_ordinal: u32,
    },
    /// Was anchored once, but its block is gone from the remote chain.
    #[codec(index = 3)]
    RollbackFailed,
    /// Was pending, then stopped being reported by the remote.
    #[codec(index = 4)]
    NotInRemote,
}

impl TxState {
    pub fn block_id(&self) -> Option<BlockRowId> {
        match self {
            TxState::InBlock { block, .. } | TxState::Failed { block, .. } => Some(*block),
            TxState::Pending | TxState::RollbackFailed | TxState::NotInRemote => None,
        }
    }

    pub fn tx_ordinal(&self) -> Option<u32> {
        match self {
            TxState::InBlock { tx_ordinal, .. } | TxState::Failed { tx_ordinal, .. } => {
                Some(*tx_ordinal)
            }
            TxState::Pending | TxState::RollbackFailed | TxState::NotInRemote => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TxState::Pending)
    }

    /// Settled states are never touched by forward reconciliation again.
    pub fn is_settled(&self) -> bool {
        matches!(self, TxState::InBlock { .. } | TxState::Failed { .. })
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            TxState::Pending => "Pending",
            TxState::InBlock { .. } => "InBlock",
            TxState::Failed { .. } => "Failed",
            TxState::RollbackFailed => "RollbackFailed",
            TxState::NotInRemote => "NotInRemote",
        }
    }
}

impl std::fmt::Display for TxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A stored transaction: the chain-level hash, the local lookup digest
/// derived from it, and the mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct TxRow {
    hash: TxHash,
    digest: TxDigest,
    state: TxState,
}

impl TxRow {
    pub fn new(hash: TxHash, state: TxState) -> Self {
        let digest = TxDigest::from_tx_hash(&hash);
        TxRow {
            hash,
            digest,
            state,
        }
    }

    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    pub fn digest(&self) -> &TxDigest {
        &self.digest
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn set_state(&mut self, state: TxState) {
        self.state = state;
    }

    pub fn block_id(&self) -> Option<BlockRowId> {
        self.state.block_id()
    }
}
