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
use serde::Serialize;

/// The distance of a block from the start of the chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, Serialize, Default,
)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub const fn zero() -> Self {
        BlockHeight(0)
    }

    pub const fn new(height: u64) -> Self {
        BlockHeight(height)
    }

    pub const fn into_int(self) -> u64 {
        self.0
    }

    pub fn next_height(self) -> BlockHeight {
        BlockHeight(self.0.checked_add(1).expect("height overflow"))
    }

    pub fn checked_sub(self, depth: u64) -> Option<BlockHeight> {
        self.0.checked_sub(depth).map(BlockHeight)
    }

    pub fn saturating_sub(self, depth: u64) -> BlockHeight {
        BlockHeight(self.0.saturating_sub(depth))
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The slot a block was minted in. Slots advance with wall-clock time whether
/// or not a block was produced, so slot numbers grow faster than heights.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, Serialize, Default,
)]
pub struct SlotNumber(u64);

impl SlotNumber {
    pub const fn new(slot: u64) -> Self {
        SlotNumber(slot)
    }

    pub const fn into_int(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The epoch a slot belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, Serialize, Default,
)]
pub struct EpochIndex(u64);

impl EpochIndex {
    pub const fn new(epoch: u64) -> Self {
        EpochIndex(epoch)
    }

    pub const fn into_int(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EpochIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
