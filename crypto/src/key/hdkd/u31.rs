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

use super::derivable::DerivationError;

/// An unsigned integer that fits in 31 bits. The top bit of a child index
/// carries the hardened flag, so plain indices must leave it clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct U31(u32);

impl U31 {
    pub const ZERO: U31 = U31(0);
    pub const ONE: U31 = U31(1);
    pub const TWO: U31 = U31(2);
    pub const MAX: U31 = U31(u32::MAX >> 1);

    pub const fn from_u32(value: u32) -> Option<U31> {
        if value <= Self::MAX.0 {
            Some(U31(value))
        } else {
            None
        }
    }

    pub const fn into_u32(self) -> u32 {
        self.0
    }

    pub fn plus_one(self) -> Result<U31, DerivationError> {
        Self::from_u32(self.0 + 1).ok_or(DerivationError::ChildIndexOverflow)
    }
}

impl std::fmt::Display for U31 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
