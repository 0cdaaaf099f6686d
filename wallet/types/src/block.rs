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

use common::primitives::{hash_bytes, BlockHeight, EpochIndex, SlotNumber, H256};

use crate::ids::BlockHash;

/// A stored block. Exists only while at least one stored transaction is
/// anchored in it; otherwise it is garbage-collected.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BlockRow {
    hash: BlockHash,
    digest: H256,
    height: BlockHeight,
    slot: SlotNumber,
    epoch: EpochIndex,
}

impl BlockRow {
    pub fn new(hash: BlockHash, height: BlockHeight, slot: SlotNumber, epoch: EpochIndex) -> Self {
        let digest = hash_bytes(hash.as_hash().as_bytes());
        BlockRow {
            hash,
            digest,
            height,
            slot,
            epoch,
        }
    }

    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    pub fn digest(&self) -> &H256 {
        &self.digest
    }

    pub fn height(&self) -> BlockHeight {
        self.height
    }

    pub fn slot(&self) -> SlotNumber {
        self.slot
    }

    pub fn epoch(&self) -> EpochIndex {
        self.epoch
    }
}
