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

use super::child_number::ChildNumber;

/// A sequence of derivation steps from a root key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    pub fn empty() -> Self {
        DerivationPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ChildNumber] {
        &self.0
    }

    /// The path of a direct child of this path.
    pub fn new_child(&self, num: ChildNumber) -> Self {
        let mut path = self.0.clone();
        path.push(num);
        DerivationPath(path)
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(path: Vec<ChildNumber>) -> Self {
        DerivationPath(path)
    }
}

impl std::fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m")?;
        for num in &self.0 {
            write!(f, "/{num}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::hdkd::u31::U31;

    #[test]
    fn display_format() {
        let path: DerivationPath = vec![
            ChildNumber::from_hardened(U31::from_u32(44).unwrap()),
            ChildNumber::from_hardened(U31::ZERO),
            ChildNumber::from_normal(U31::from_u32(5).unwrap()),
        ]
        .into();
        assert_eq!(path.to_string(), "m/44'/0'/5");
        assert_eq!(DerivationPath::empty().to_string(), "m");
    }
}
