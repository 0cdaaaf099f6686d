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

use common::primitives::{BlockHeight, SlotNumber};

use crate::ids::BlockHash;

/// The best known remote chain position of a public deriver.
///
/// Advances monotonically with each applied sync cycle; the only thing
/// allowed to move it backwards is rollback compensation. The null position
/// (all-`None`, height zero) is the state of a freshly created deriver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct LastSyncInfo {
    time: Option<u64>,
    slot: Option<SlotNumber>,
    block_hash: Option<BlockHash>,
    height: BlockHeight,
}

impl LastSyncInfo {
    pub fn at_position(
        time: Option<u64>,
        slot: Option<SlotNumber>,
        block_hash: Option<BlockHash>,
        height: BlockHeight,
    ) -> Self {
        LastSyncInfo {
            time,
            slot,
            block_hash,
            height,
        }
    }

    pub fn time(&self) -> Option<u64> {
        self.time
    }

    pub fn slot(&self) -> Option<SlotNumber> {
        self.slot
    }

    pub fn block_hash(&self) -> Option<&BlockHash> {
        self.block_hash.as_ref()
    }

    pub fn height(&self) -> BlockHeight {
        self.height
    }
}
