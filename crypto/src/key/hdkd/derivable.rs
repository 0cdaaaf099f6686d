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

use super::child_number::ChildNumber;
use super::derivation_path::DerivationPath;

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DerivationError {
    #[error("Cannot derive a hardened child ({0}) from a public key")]
    CannotDeriveHardenedInPublic(ChildNumber),
    #[error("Derivation produced invalid key material")]
    InvalidKeyMaterial,
    #[error("Invalid public key encoding")]
    InvalidPublicKeyEncoding,
    #[error("Child index overflow")]
    ChildIndexOverflow,
}

/// Anything that can derive a child of itself along an index path.
pub trait Derivable: Sized {
    fn derive_child(self, num: ChildNumber) -> Result<Self, DerivationError>;

    fn get_derivation_path(&self) -> &DerivationPath;

    /// Derive along all steps of a path relative to this key.
    fn derive_path(self, path: &[ChildNumber]) -> Result<Self, DerivationError> {
        path.iter().try_fold(self, |key, num| key.derive_child(*num))
    }
}
