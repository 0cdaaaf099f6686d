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

use super::u31::U31;

const HARDENED_FLAG: u32 = 1 << 31;

/// A single derivation step: a 31-bit index plus the hardened flag in the
/// top bit, following the usual BIP32-style encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct ChildNumber(u32);

impl ChildNumber {
    pub const fn from_hardened(index: U31) -> Self {
        ChildNumber(index.into_u32() | HARDENED_FLAG)
    }

    pub const fn from_normal(index: U31) -> Self {
        ChildNumber(index.into_u32())
    }

    /// Reconstruct from the wire encoding where the top bit is the hardened flag.
    pub const fn from_encoded_index(value: u32) -> Self {
        ChildNumber(value)
    }

    pub const fn is_hardened(self) -> bool {
        self.0 & HARDENED_FLAG != 0
    }

    pub fn get_index(self) -> U31 {
        U31::from_u32(self.0 & !HARDENED_FLAG).expect("masked to 31 bits")
    }

    pub const fn into_encoded_index(self) -> u32 {
        self.0
    }

    pub fn into_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl std::fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_index())?;
        if self.is_hardened() {
            write!(f, "'")?;
        }
        Ok(())
    }
}
