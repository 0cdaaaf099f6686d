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

use blake2::digest::consts::U28;
use blake2::{Blake2b, Digest};
use parity_scale_codec::{Decode, Encode};

pub const CREDENTIAL_SIZE: usize = 28;

type Blake2b224 = Blake2b<U28>;

/// A payment or staking credential: the blake2b-224 hash of a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct Credential([u8; CREDENTIAL_SIZE]);

impl Credential {
    pub fn from_public_key_bytes(key_bytes: &[u8]) -> Self {
        let mut hasher = Blake2b224::new();
        hasher.update(key_bytes);
        let mut out = [0_u8; CREDENTIAL_SIZE];
        out.copy_from_slice(&hasher.finalize());
        Credential(out)
    }

    pub const fn from_raw(bytes: [u8; CREDENTIAL_SIZE]) -> Self {
        Credential(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_deterministic() {
        let a = Credential::from_public_key_bytes(b"some public key bytes");
        let b = Credential::from_public_key_bytes(b"some public key bytes");
        let c = Credential::from_public_key_bytes(b"other public key bytes");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
