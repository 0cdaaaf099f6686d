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

use crypto::kdf::KdfChallenge;
use crypto::key::extended::ExtendedKeyKind;
use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::u31::U31;

/// The stored form of a key blob. Private key material is only ever stored
/// in the `Encrypted` form; public keys are stored `Plain`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum KeyMaterial {
    #[codec(index = 0)]
    Plain(Vec<u8>),
    #[codec(index = 1)]
    Encrypted {
        challenge: KdfChallenge,
        blob: Vec<u8>,
    },
}

/// A stored key: the kind tag routing derivation plus the material.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct KeyRow {
    kind: ExtendedKeyKind,
    material: KeyMaterial,
}

impl KeyRow {
    pub fn new(kind: ExtendedKeyKind, material: KeyMaterial) -> Self {
        KeyRow { kind, material }
    }

    pub fn kind(&self) -> ExtendedKeyKind {
        self.kind
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self.material, KeyMaterial::Encrypted { .. })
    }
}

/// Which of the two leaf chains of an account an address belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, serde::Serialize,
)]
pub enum KeyPurpose {
    /// Addresses handed out to receive funds.
    #[codec(index = 0)]
    External,
    /// Change addresses, never shown by default.
    #[codec(index = 1)]
    Internal,
}

impl KeyPurpose {
    pub const ALL: [KeyPurpose; 2] = [KeyPurpose::External, KeyPurpose::Internal];

    /// The chain-level derivation index of this purpose.
    pub fn get_deterministic_index(self) -> ChildNumber {
        match self {
            KeyPurpose::External => ChildNumber::from_normal(U31::ZERO),
            KeyPurpose::Internal => ChildNumber::from_normal(U31::ONE),
        }
    }
}

/// How far a derivation chain has been used and issued.
///
/// `last_used` advances when chain activity is seen for an address;
/// `last_issued` advances when an address is handed out to the user. Both
/// only ever move forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct KeychainUsageState {
    last_used: Option<U31>,
    last_issued: Option<U31>,
}

impl KeychainUsageState {
    pub fn new(last_used: Option<U31>, last_issued: Option<U31>) -> Self {
        Self {
            last_used,
            last_issued,
        }
    }

    pub fn last_used(&self) -> Option<U31> {
        self.last_used
    }

    pub fn last_issued(&self) -> Option<U31> {
        self.last_issued
    }

    /// Move `last_used` up to the given index if it is ahead of the current value.
    pub fn increment_up_to_last_used(&mut self, index: U31) {
        if self.last_used.is_none() || self.last_used < Some(index) {
            self.last_used = Some(index);
        }
    }

    /// Move `last_issued` up to the given index if it is ahead of the current value.
    pub fn increment_up_to_last_issued(&mut self, index: U31) {
        if self.last_issued.is_none() || self.last_issued < Some(index) {
            self.last_issued = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_state_only_moves_forward() {
        let mut state = KeychainUsageState::default();
        assert_eq!(state.last_used(), None);

        state.increment_up_to_last_used(U31::from_u32(5).unwrap());
        assert_eq!(state.last_used(), U31::from_u32(5));

        state.increment_up_to_last_used(U31::from_u32(2).unwrap());
        assert_eq!(state.last_used(), U31::from_u32(5));

        state.increment_up_to_last_issued(U31::ZERO);
        assert_eq!(state.last_issued(), Some(U31::ZERO));
    }
}
