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

use blake2::digest::{consts::U32, Digest};
use blake2::Blake2b;
use parity_scale_codec::{Decode, Encode};

type Blake2b256 = Blake2b<U32>;

/// A 256-bit content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct H256(pub [u8; 32]);

impl H256 {
    pub const fn zero() -> Self {
        H256([0_u8; 32])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 32] = slice.try_into().ok()?;
        Some(H256(bytes))
    }
}

impl std::fmt::Display for H256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl serde::Serialize for H256 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

/// Digest of the SCALE encoding of a value.
pub fn hash_encoded<T: Encode>(value: &T) -> H256 {
    hash_bytes(&value.encode())
}

/// Blake2b-256 digest of raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> H256 {
    let mut hasher = Blake2b256::new();
    hasher.update(bytes);
    let mut out = [0_u8; 32];
    out.copy_from_slice(&hasher.finalize());
    H256(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_content_addressed() {
        let a = hash_bytes(b"same input");
        let b = hash_bytes(b"same input");
        let c = hash_bytes(b"other input");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string().len(), 64);
    }
}
